use serde::de::DeserializeOwned;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(format!("at JSON path {path}: {}", err.into_inner()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn parse_errors_carry_the_json_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Doc {
            #[allow(dead_code)]
            count: u32,
        }
        let err = from_str_with_path::<Doc>(r#"{ "count": "three" }"#).unwrap_err();
        assert!(err.contains("count"), "path missing from: {err}");
    }

    #[test]
    fn valid_json_parses_to_a_value() {
        let v: Value = from_str_with_path(r#"{ "a": 1 }"#).unwrap();
        assert_eq!(v["a"], 1);
    }
}
