use pocketledger_api::SortDirection;

use crate::error::FinanceError;

/// Page size used when every page of a resource is fetched.
pub const FULL_DATA_PAGE_SIZE: u32 = 100;

/// Values an export dialog starts from: the sort and page size of the list
/// currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportDefaults<K> {
    pub rows_quantity: u32,
    pub sort_field: Option<K>,
    pub sort_direction: SortDirection,
}

/// Per-dialog export settings. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportConfig<K> {
    pub full_data: bool,
    rows_quantity: u32,
    pub sort_field: Option<K>,
    pub sort_direction: SortDirection,
}

impl<K: Copy> ExportConfig<K> {
    pub fn from_defaults(defaults: &ExportDefaults<K>) -> Self {
        Self {
            full_data: false,
            rows_quantity: defaults.rows_quantity.max(1),
            sort_field: defaults.sort_field,
            sort_direction: defaults.sort_direction,
        }
    }

    pub fn rows_quantity(&self) -> u32 {
        self.rows_quantity
    }

    /// Rows to export when only one page is fetched. Must be positive.
    pub fn set_rows_quantity(&mut self, rows: u32) -> Result<(), FinanceError> {
        if rows == 0 {
            return Err(FinanceError::InvalidInput(
                "rows quantity must be greater than zero".to_string(),
            ));
        }
        self.rows_quantity = rows;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_from_defaults_with_full_data_off() {
        let defaults = ExportDefaults {
            rows_quantity: 25,
            sort_field: Some("name"),
            sort_direction: SortDirection::Asc,
        };
        let config = ExportConfig::from_defaults(&defaults);
        assert!(!config.full_data);
        assert_eq!(config.rows_quantity(), 25);
        assert_eq!(config.sort_field, Some("name"));
        assert_eq!(config.sort_direction, SortDirection::Asc);
    }

    #[test]
    fn zero_rows_rejected() {
        let defaults = ExportDefaults::<()> {
            rows_quantity: 10,
            sort_field: None,
            sort_direction: SortDirection::Desc,
        };
        let mut config = ExportConfig::from_defaults(&defaults);
        assert!(config.set_rows_quantity(0).is_err());
        assert_eq!(config.rows_quantity(), 10);
        config.set_rows_quantity(40).unwrap();
        assert_eq!(config.rows_quantity(), 40);
    }
}
