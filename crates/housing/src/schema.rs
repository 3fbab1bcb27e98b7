//! Feature schema
//!
//! Requests and training data use exactly these six columns, in this order.

/// Ordered model input columns
pub const FEATURES: [&str; 6] = ["CHAS", "RM", "TAX", "PTRATIO", "B", "LSTAT"];

/// Location of the serialized pipeline, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "./model_data/boston_housing_prediction.joblib";

/// Owned copy of [`FEATURES`]
pub fn feature_names() -> Vec<String> {
    FEATURES.iter().map(|name| name.to_string()).collect()
}

pub fn is_feature(name: &str) -> bool {
    FEATURES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_names_keep_order() {
        assert_eq!(
            feature_names(),
            vec!["CHAS", "RM", "TAX", "PTRATIO", "B", "LSTAT"]
        );
    }

    #[test]
    fn test_is_feature_is_case_sensitive() {
        assert!(is_feature("LSTAT"));
        assert!(!is_feature("lstat"));
        assert!(!is_feature("AGE"));
    }
}
