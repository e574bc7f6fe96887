//! 订单状态

use std::fmt;
use std::str::FromStr;

use halcon_errors::AppError;
use serde::{Deserialize, Serialize};

/// 订单状态（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Ordered,
    #[serde(rename = "In Process")]
    InProcess,
    #[serde(rename = "In Route")]
    InRoute,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Ordered,
        OrderStatus::InProcess,
        OrderStatus::InRoute,
        OrderStatus::Delivered,
    ];

    /// 对外名称，与持久化值一致
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "Ordered",
            OrderStatus::InProcess => "In Process",
            OrderStatus::InRoute => "In Route",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::validation(format!("Unknown order status: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_names() {
        assert_eq!("In Process".parse::<OrderStatus>().unwrap(), OrderStatus::InProcess);
        assert_eq!("Delivered".parse::<OrderStatus>().unwrap(), OrderStatus::Delivered);
        assert!("InProcess".parse::<OrderStatus>().is_err());
        assert!("".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_display_names() {
        assert_eq!(serde_json::to_string(&OrderStatus::InRoute).unwrap(), "\"In Route\"");
        let status: OrderStatus = serde_json::from_str("\"In Process\"").unwrap();
        assert_eq!(status, OrderStatus::InProcess);
    }
}
