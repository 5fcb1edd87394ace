use serde::de::Error as _;
use serde::{Deserialize, Serialize};

use crate::models::{OrderDetails, OrderNotification};

// -- Health --

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
        }
    }
}

// -- Notify order --

/// Body of `POST /notify-order`.
///
/// The storefront sends either a bare order reference or the full checkout
/// form. Fields neither shape knows about are ignored.
#[derive(Debug)]
pub enum NotifyOrderRequest {
    Details(OrderDetailsRequest),
    Reference(OrderReferenceRequest),
}

#[derive(Debug, Deserialize)]
pub struct OrderReferenceRequest {
    pub order_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderDetailsRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub name: String,
    pub product: String,
    pub quantity: u32,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub slip_url: Option<String>,
}

impl NotifyOrderRequest {
    /// Decode a JSON body. The shape is chosen from the keys present before
    /// decoding, so a bad body names the field that is missing.
    ///
    /// A body with `order_id` and no `name` is a reference; anything else is
    /// read as the checkout form.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        let Some(fields) = value.as_object() else {
            return Err(serde_json::Error::custom("expected a JSON object"));
        };

        if fields.contains_key("order_id") && !fields.contains_key("name") {
            serde_json::from_value(value).map(Self::Reference)
        } else {
            serde_json::from_value(value).map(Self::Details)
        }
    }

    /// Split into the requested recipient (if any) and the order to render.
    pub fn into_parts(self) -> (Option<String>, OrderNotification) {
        match self {
            Self::Reference(r) => (r.user_id, OrderNotification::Reference { order_id: r.order_id }),
            Self::Details(d) => (
                d.user_id,
                OrderNotification::Details(OrderDetails {
                    name: d.name,
                    product: d.product,
                    quantity: d.quantity,
                    phone: d.phone,
                    address: d.address,
                    note: d.note,
                    slip_url: d.slip_url,
                }),
            ),
        }
    }
}

/// Legacy query form: `POST /notify-order?order_id=...` with no body.
#[derive(Debug, Default, Deserialize)]
pub struct NotifyOrderQuery {
    pub order_id: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyOrderResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub status_code: u16,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<RecipientResult>>,
}

/// Outcome of one push during a broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipientResult {
    pub user_id: String,
    pub success: bool,
    pub status_code: u16,
    pub response: String,
}

// -- Recipients --

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub count: usize,
    pub users: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_body_parses() {
        let req = NotifyOrderRequest::from_slice(br#"{"order_id":"A-1001","user_id":"U123"}"#).unwrap();
        let (user_id, order) = req.into_parts();
        assert_eq!(user_id.as_deref(), Some("U123"));
        assert_eq!(order, OrderNotification::Reference { order_id: "A-1001".into() });
    }

    #[test]
    fn details_body_parses_with_optional_fields_absent() {
        let req = NotifyOrderRequest::from_slice(
            br#"{"name":"Somchai","product":"Teak chair","quantity":2,
                "phone":"0812345678","address":"Bangkok"}"#,
        )
        .unwrap();
        let (user_id, order) = req.into_parts();
        assert!(user_id.is_none());
        match order {
            OrderNotification::Details(d) => {
                assert_eq!(d.quantity, 2);
                assert!(d.note.is_none());
                assert!(d.slip_url.is_none());
            }
            other => panic!("expected details, got {:?}", other),
        }
    }

    #[test]
    fn unrelated_body_is_rejected() {
        assert!(NotifyOrderRequest::from_slice(br#"{"hello":"world"}"#).is_err());
        assert!(NotifyOrderRequest::from_slice(br#"{"name":"only a name"}"#).is_err());
        assert!(NotifyOrderRequest::from_slice(br#"["A-1"]"#).is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let req = NotifyOrderRequest::from_slice(
            br#"{"name":"Somchai","product":"Teak chair","quantity":1,"phone":"081",
                "address":"Bangkok","email":"a@b.example","total":1290}"#,
        )
        .unwrap();
        assert!(matches!(req.into_parts().1, OrderNotification::Details(_)));

        let req = NotifyOrderRequest::from_slice(br#"{"order_id":"A-7","source":"web"}"#).unwrap();
        assert_eq!(req.into_parts().1, OrderNotification::Reference { order_id: "A-7".into() });
    }

    #[test]
    fn rejection_names_the_missing_field() {
        let err = NotifyOrderRequest::from_slice(br#"{"name":"only a name"}"#).unwrap_err();
        assert!(err.to_string().contains("missing field `product`"), "{}", err);

        let err = NotifyOrderRequest::from_slice(br#"{"order_id":7}"#).unwrap_err();
        assert!(err.to_string().contains("invalid type"), "{}", err);

        let err = NotifyOrderRequest::from_slice(b"[]").unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"), "{}", err);
    }

    #[test]
    fn single_response_omits_results() {
        let resp = NotifyOrderResponse {
            success: true,
            user_id: Some("U1".into()),
            status_code: 200,
            response: "{}".into(),
            results: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("results").is_none());
        assert_eq!(json["user_id"], "U1");
    }
}
