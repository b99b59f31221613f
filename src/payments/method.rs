use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment method labels accepted by the ledger.
///
/// The Spanish aliases match rows recorded by the earlier register
/// software, so historical data keeps aggregating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[serde(alias = "efectivo")]
    Cash,
    Qr,
    #[serde(alias = "transferencia")]
    Transfer,
    #[serde(alias = "tarjeta")]
    Card,
    #[serde(alias = "diferencia")]
    Adjustment,
}

impl Method {
    /// Fixed label set, in register display order.
    pub const ALL: [Method; 5] = [
        Method::Cash,
        Method::Qr,
        Method::Transfer,
        Method::Card,
        Method::Adjustment,
    ];

    /// Case-insensitive parse over the canonical labels and their Spanish
    /// aliases.
    pub fn parse(label: &str) -> Option<Method> {
        match label.trim().to_lowercase().as_str() {
            "cash" | "efectivo" => Some(Method::Cash),
            "qr" => Some(Method::Qr),
            "transfer" | "transferencia" => Some(Method::Transfer),
            "card" | "tarjeta" => Some(Method::Card),
            "adjustment" | "diferencia" => Some(Method::Adjustment),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Cash => "cash",
            Method::Qr => "qr",
            Method::Transfer => "transfer",
            Method::Card => "card",
            Method::Adjustment => "adjustment",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_labels() {
        for method in Method::ALL {
            assert_eq!(Method::parse(method.as_str()), Some(method));
        }
    }

    #[test]
    fn parses_legacy_spanish_labels() {
        assert_eq!(Method::parse("efectivo"), Some(Method::Cash));
        assert_eq!(Method::parse("Transferencia"), Some(Method::Transfer));
        assert_eq!(Method::parse("TARJETA"), Some(Method::Card));
        assert_eq!(Method::parse("diferencia"), Some(Method::Adjustment));
    }

    #[test]
    fn rejects_unknown_labels() {
        assert_eq!(Method::parse("cheque"), None);
        assert_eq!(Method::parse(""), None);
    }

    #[test]
    fn serializes_as_lowercase_label() {
        let json = serde_json::to_string(&Method::Adjustment).expect("serialize");
        assert_eq!(json, "\"adjustment\"");
    }
}
