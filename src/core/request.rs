use crate::domain::model::BuybackContractsReq;

pub const DEFAULT_LANGUAGE: &str = "en";

/// The fixed "get contracts" payload. Items, check results and buy details are
/// never requested; only identity and timing are consumed downstream.
pub fn buyback_contracts_request(refresh_token: &str) -> BuybackContractsReq {
    BuybackContractsReq {
        include_items: false,
        include_check: false,
        include_buy: false,
        refresh_token: refresh_token.to_string(),
        language: DEFAULT_LANGUAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_disables_all_details() {
        let request = buyback_contracts_request("token-1");

        assert!(!request.include_items);
        assert!(!request.include_check);
        assert!(!request.include_buy);
        assert_eq!(request.refresh_token, "token-1");
        assert_eq!(request.language, "en");
    }

    #[test]
    fn test_request_wire_shape() {
        let request = buyback_contracts_request("t");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "include_items": false,
                "include_check": false,
                "include_buy": false,
                "refresh_token": "t",
                "language": "en"
            })
        );
    }
}
