use serde::{Deserialize, Serialize};

/// Transaction request passed through to the wallet untouched.
///
/// Quantities (`value`, `gas`, ...) are hex strings, as the wallet APIs expect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
}

impl TransactionRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: impl Into<String>) -> Self {
        self.gas_limit = Some(gas_limit.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_omitted() {
        let tx = TransactionRequest::new("0xa", "0xb");
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json, serde_json::json!({ "from": "0xa", "to": "0xb" }));
    }

    #[test]
    fn test_camel_case_gas_fields() {
        let tx = TransactionRequest::new("0xa", "0xb")
            .with_gas_limit("0x5208")
            .with_data("0x");
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["gasLimit"], "0x5208");
        assert_eq!(json["data"], "0x");
    }
}
