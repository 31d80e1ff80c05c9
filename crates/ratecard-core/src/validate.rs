//! Submission validation for rate tables
//!
//! Every numeric leaf of the document must be a finite number that is
//! zero or greater. The walk visits `hourlyRate`, then the three
//! category maps in insertion order, then any unknown members
//! (recursively); the first offending leaf aborts validation and is
//! reported by its wire path, e.g. `project.landing` or `discounts[1]`.
//! Non-numeric values inside unknown members are not priced and pass
//! untouched.

use crate::error::ValidationError;
use crate::types::RateTable;
use indexmap::IndexMap;
use serde_json::Value;

/// Check a table before it is sent to the write endpoint
///
/// Returns the first offender found, or `Ok(())` when every numeric
/// leaf is finite and non-negative.
pub fn validate_for_submission(rates: &RateTable) -> Result<(), ValidationError> {
    check_leaf("hourlyRate", rates.hourly_rate)?;
    check_category("project", &rates.project)?;
    check_category("design", &rates.design)?;
    check_category("modules", &rates.modules)?;
    for (key, value) in &rates.extra {
        check_value(key, value)?;
    }
    Ok(())
}

fn check_category(name: &str, entries: &IndexMap<String, f64>) -> Result<(), ValidationError> {
    for (key, value) in entries {
        check_leaf(&format!("{name}.{key}"), *value)?;
    }
    Ok(())
}

fn check_leaf(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_nan() {
        return Err(ValidationError::NotANumber {
            field: field.to_owned(),
        });
    }
    if value.is_infinite() {
        return Err(ValidationError::NotFinite {
            field: field.to_owned(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue {
            field: field.to_owned(),
            value,
        });
    }
    Ok(())
}

fn check_value(path: &str, value: &Value) -> Result<(), ValidationError> {
    match value {
        Value::Number(number) => {
            if let Some(value) = number.as_f64() {
                check_leaf(path, value)?;
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                check_value(&format!("{path}[{index}]"), item)?;
            }
        }
        Value::Object(members) => {
            for (key, item) in members {
                check_value(&format!("{path}.{key}"), item)?;
            }
        }
        Value::Null | Value::Bool(_) | Value::String(_) => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RateTable;
    use pretty_assertions::assert_eq;

    fn valid_rates() -> RateTable {
        RateTable::new()
            .with_hourly_rate(25.0)
            .with_project("landing", 40.0)
            .with_design("custom", 40.0)
            .with_module("seo", 8.0)
    }

    #[test]
    fn accepts_a_well_formed_table() {
        assert!(validate_for_submission(&valid_rates()).is_ok());
    }

    #[test]
    fn accepts_zero_valued_leaves() {
        let rates = valid_rates().with_hourly_rate(0.0).with_module("free", 0.0);
        assert!(validate_for_submission(&rates).is_ok());
    }

    #[test]
    fn rejects_nan_hourly_rate() {
        let rates = valid_rates().with_hourly_rate(f64::NAN);
        let err = validate_for_submission(&rates).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotANumber {
                field: "hourlyRate".into()
            }
        );
    }

    #[test]
    fn rejects_infinite_leaf() {
        let rates = valid_rates().with_design("bespoke", f64::INFINITY);
        let err = validate_for_submission(&rates).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotFinite {
                field: "design.bespoke".into()
            }
        );
    }

    #[test]
    fn rejects_negative_leaf_with_wire_path() {
        let rates = valid_rates().with_module("seo", -8.0);
        let err = validate_for_submission(&rates).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeValue {
                field: "modules.seo".into(),
                value: -8.0
            }
        );
    }

    #[test]
    fn first_offender_wins() {
        let rates = valid_rates()
            .with_project("broken", -1.0)
            .with_design("also-broken", -2.0);
        let err = validate_for_submission(&rates).unwrap_err();
        assert_eq!(err.field(), "project.broken");
    }

    #[test]
    fn walks_unknown_members_recursively() {
        let doc = r#"{"hourlyRate":20,"rush":{"weekend":-12}}"#;
        let rates: RateTable = serde_json::from_str(doc).unwrap();
        let err = validate_for_submission(&rates).unwrap_err();
        assert_eq!(err.field(), "rush.weekend");
    }

    #[test]
    fn indexes_offenders_inside_arrays() {
        let doc = r#"{"hourlyRate":20,"discounts":[10,-5,3]}"#;
        let rates: RateTable = serde_json::from_str(doc).unwrap();
        let err = validate_for_submission(&rates).unwrap_err();
        assert_eq!(err.field(), "discounts[1]");
    }

    #[test]
    fn non_numeric_unknown_members_pass() {
        let doc = r#"{"hourlyRate":20,"notes":"internal only","enabled":true,"legacy":null}"#;
        let rates: RateTable = serde_json::from_str(doc).unwrap();
        assert!(validate_for_submission(&rates).is_ok());
    }
}
