//! Response decoding that tolerates, and reports, fields this crate does not model.
//!
//! The order book and the subgraphs add fields without notice. Decoding never fails on
//! them; with the `tracing` feature each one is logged as a warning carrying its JSON
//! pointer and value, and a failed decode logs the pointer of the offending value.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes `value` into `T`, warning about every field `T` ignores.
///
/// ```ignore
/// let json = serde_json::json!({ "uid": "0x01", "status": "open", "class": "limit", .. });
/// let order: OrderStatus = deserialize_with_warnings(json)?;
/// // WARN unknown field in API response field="/class" value="\"limit\""
/// ```
#[cfg(feature = "tracing")]
pub fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    let type_name = std::any::type_name::<T>();
    tracing::trace!(%type_name, json = %value, "deserializing JSON");

    let mut unknown: Vec<String> = Vec::new();
    let decoded = serde_ignored::deserialize(&value, |path| unknown.push(ignored_pointer(&path)));

    let decoded: T = match decoded {
        Ok(decoded) => decoded,
        Err(error) => {
            if let Err(located) = serde_path_to_error::deserialize::<_, T>(&value) {
                let pointer = error_pointer(located.path());
                tracing::error!(
                    %type_name,
                    path = %pointer,
                    value = %display_at(&value, &pointer),
                    error = %located.inner(),
                    "deserialization failed"
                );
            }
            return Err(error.into());
        }
    };

    for pointer in unknown {
        tracing::warn!(
            %type_name,
            field = %pointer,
            value = %display_at(&value, &pointer),
            "unknown field in API response"
        );
    }

    Ok(decoded)
}

/// Pass-through deserialization when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub fn deserialize_with_warnings<T: DeserializeOwned>(value: Value) -> crate::Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// RFC 6901 pointer of a field skipped by `serde_ignored`. Option and newtype wrappers
/// have no JSON counterpart and add no segment.
#[cfg(feature = "tracing")]
fn ignored_pointer(path: &serde_ignored::Path<'_>) -> String {
    use serde_ignored::Path;

    match path {
        Path::Root => String::new(),
        Path::Seq { parent, index } => format!("{}/{index}", ignored_pointer(parent)),
        Path::Map { parent, key } => format!("{}/{}", ignored_pointer(parent), escape(key)),
        Path::Some { parent } | Path::NewtypeStruct { parent } | Path::NewtypeVariant { parent } => {
            ignored_pointer(parent)
        }
    }
}

#[cfg(feature = "tracing")]
fn error_pointer(path: &serde_path_to_error::Path) -> String {
    use serde_path_to_error::Segment;

    path.iter()
        .filter_map(|segment| match segment {
            Segment::Seq { index } => Some(format!("/{index}")),
            Segment::Map { key } => Some(format!("/{}", escape(key))),
            Segment::Enum { .. } | Segment::Unknown => None,
        })
        .collect()
}

#[cfg(feature = "tracing")]
fn escape(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

#[cfg(feature = "tracing")]
fn display_at(value: &Value, pointer: &str) -> String {
    value
        .pointer(pointer)
        .map_or_else(|| "<missing>".to_owned(), Value::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::deserialize_with_warnings;
    use crate::error::Kind;

    #[cfg(feature = "trade")]
    fn order_status(extra: Value) -> Value {
        let mut status = json!({
            "uid": "0xorderuid",
            "status": "open",
            "executedSellAmount": "0",
            "executedBuyAmount": "0"
        });
        if let (Value::Object(status), Value::Object(extra)) = (&mut status, extra) {
            status.extend(extra);
        }
        status
    }

    #[cfg(feature = "trade")]
    #[test]
    fn order_status_tolerates_new_order_book_fields() {
        use crate::trade::cow::{OrderState, OrderStatus};

        let order: OrderStatus = deserialize_with_warnings(order_status(json!({
            "class": "limit",
            "creationDate": "2023-11-14T22:13:20Z",
            "onchainOrderData": { "sender": "0x01" }
        })))
        .unwrap();

        assert_eq!(order.uid, "0xorderuid");
        assert_eq!(order.status, OrderState::Open);
        assert!(order.status.is_pending(), "open orders can still fill");
    }

    #[cfg(feature = "trade")]
    #[test]
    fn order_status_with_bad_amount_is_an_internal_error() {
        use crate::trade::cow::OrderStatus;

        let mut json = order_status(json!({}));
        json["executedSellAmount"] = json!("lots");

        let err = deserialize_with_warnings::<OrderStatus>(json).unwrap_err();

        assert_eq!(err.kind(), Kind::Internal);
    }

    #[cfg(feature = "pools")]
    #[test]
    fn pool_without_required_leg_fails() {
        use crate::pools::types::Pool;

        let json = json!({
            "id": "0x1111111111111111111111111111111111111111",
            "fee": "100",
            "liquidity": "0",
            "token0": { "id": "0x0000000000000000000000000000000000000001", "symbol": "YES", "decimals": "18" },
            "totalValueLockedUSD": "0"
        });

        let err = deserialize_with_warnings::<Pool>(json).unwrap_err();

        assert_eq!(err.kind(), Kind::Internal);
        assert!(err.to_string().contains("token1"), "unexpected message: {err}");
    }

    #[test]
    fn mistyped_payload_is_an_internal_error() {
        let err = deserialize_with_warnings::<Vec<u8>>(json!({ "data": null })).unwrap_err();

        assert_eq!(err.kind(), Kind::Internal);
    }

    #[test]
    fn null_resource_decodes_as_none() {
        let decoded: Option<Vec<String>> = deserialize_with_warnings(Value::Null).unwrap();

        assert_eq!(decoded, None);
    }

    #[cfg(feature = "tracing")]
    mod warnings {
        use std::fmt;
        use std::sync::{Arc, Mutex};

        use tracing::field::{Field, Visit};
        use tracing::{Event, Level, Subscriber};
        use tracing_subscriber::Layer;
        use tracing_subscriber::layer::{Context, SubscriberExt as _};

        use super::*;

        /// Collects the `field` of every warning.
        #[derive(Clone, Default)]
        struct UnknownFields(Arc<Mutex<Vec<String>>>);

        struct FieldVisitor(Option<String>);

        impl Visit for FieldVisitor {
            fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
                if field.name() == "field" {
                    self.0 = Some(format!("{value:?}"));
                }
            }
        }

        impl<S: Subscriber> Layer<S> for UnknownFields {
            fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
                if *event.metadata().level() != Level::WARN {
                    return;
                }
                let mut visitor = FieldVisitor(None);
                event.record(&mut visitor);
                if let Some(field) = visitor.0 {
                    self.0.lock().unwrap().push(field);
                }
            }
        }

        fn unknown_fields<T, F: FnOnce() -> T>(decode: F) -> (T, Vec<String>) {
            let layer = UnknownFields::default();
            let subscriber = tracing_subscriber::registry().with(layer.clone());

            let decoded = tracing::subscriber::with_default(subscriber, decode);
            let fields = layer.0.lock().unwrap().clone();

            (decoded, fields)
        }

        #[cfg(feature = "trade")]
        #[test]
        fn cow_quote_reports_unmodelled_fields() {
            use crate::trade::cow::QuoteResponse;

            let json = json!({
                "quote": {
                    "sellToken": "0xaf204776c7245bf4147c2612bf6e5972ee483701",
                    "buyToken": "0x1111111111111111111111111111111111111111",
                    "receiver": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
                    "sellAmount": "990000000000000000",
                    "buyAmount": "2000000000000000000",
                    "validTo": 1_700_001_800,
                    "appData": "0x0000000000000000000000000000000000000000000000000000000000000000",
                    "feeAmount": "10000000000000000",
                    "kind": "sell",
                    "partiallyFillable": false,
                    "sellTokenBalance": "erc20",
                    "buyTokenBalance": "erc20",
                    "signingScheme": "eip712"
                },
                "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
                "expiration": "2023-11-14T22:43:20Z",
                "id": 4242,
                "verified": true
            });

            let (quote, mut fields) =
                unknown_fields(|| deserialize_with_warnings::<QuoteResponse>(json));
            fields.sort();

            assert_eq!(quote.unwrap().id, Some(4242));
            assert_eq!(fields, ["/expiration", "/quote/signingScheme", "/verified"]);
        }

        #[cfg(feature = "pools")]
        #[test]
        fn subgraph_pool_reports_unmodelled_fields() {
            use crate::pools::types::Pool;

            let json = json!({
                "id": "0x1111111111111111111111111111111111111111",
                "fee": "100",
                "feeTier": "500",
                "liquidity": "0",
                "token0": {
                    "id": "0x0000000000000000000000000000000000000001",
                    "symbol": "YES",
                    "decimals": "18",
                    "name": "Yes"
                },
                "token1": {
                    "id": "0xaf204776c7245bf4147c2612bf6e5972ee483701",
                    "symbol": "sDAI",
                    "decimals": "18"
                },
                "totalValueLockedUSD": "10"
            });

            let (pool, mut fields) = unknown_fields(|| deserialize_with_warnings::<Pool>(json));
            fields.sort();

            assert_eq!(pool.unwrap().fee, 100);
            assert_eq!(fields, ["/feeTier", "/token0/name"]);
        }

        #[test]
        fn modelled_payload_warns_about_nothing() {
            let (decoded, fields) = unknown_fields(|| {
                deserialize_with_warnings::<Option<Vec<String>>>(json!(["sDAI", "WXDAI"]))
            });

            assert_eq!(decoded.unwrap(), Some(vec!["sDAI".to_owned(), "WXDAI".to_owned()]));
            assert!(fields.is_empty(), "unexpected warnings: {fields:?}");
        }
    }
}
