use serde::{Deserialize, Serialize};

use crate::BookingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    Wallet,
    Upi,
    Card,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Wallet => write!(f, "wallet"),
            PaymentMethod::Upi => write!(f, "upi"),
            PaymentMethod::Card => write!(f, "card"),
        }
    }
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Wallet, PaymentMethod::Upi, PaymentMethod::Card];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Wallet => "SuryaVolt Wallet",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "Credit/Debit Card",
        }
    }

    /// The wallet can only pay when its balance covers the total. UPI and
    /// cards are always offered.
    pub fn is_available(&self, total: u64, wallet_balance: u64) -> bool {
        match self {
            PaymentMethod::Wallet => wallet_balance >= total,
            PaymentMethod::Upi | PaymentMethod::Card => true,
        }
    }

    pub fn ensure_available(&self, total: u64, wallet_balance: u64) -> Result<(), BookingError> {
        if self.is_available(total, wallet_balance) {
            Ok(())
        } else {
            Err(BookingError::PaymentMethodUnavailable {
                method: *self,
                total,
                balance: wallet_balance,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOption {
    pub method: PaymentMethod,
    pub label: String,
    pub available: bool,
}

pub fn payment_options(total: u64, wallet_balance: u64) -> Vec<PaymentOption> {
    PaymentMethod::ALL
        .iter()
        .map(|method| PaymentOption {
            method: *method,
            label: method.label().to_string(),
            available: method.is_available(total, wallet_balance),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    balance: u64,
}

impl Wallet {
    pub fn new(balance: u64) -> Self {
        Wallet { balance }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn top_up(&mut self, amount: u64) -> Result<u64, BookingError> {
        if amount == 0 {
            return Err(BookingError::invalid_input("top-up amount must be positive"));
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| BookingError::invalid_input("top-up amount is too large"))?;
        tracing::info!("Wallet topped up by {}, balance {}", amount, self.balance);
        Ok(self.balance)
    }

    pub fn debit(&mut self, amount: u64) -> Result<u64, BookingError> {
        if amount > self.balance {
            return Err(BookingError::InsufficientBalance {
                requested: amount,
                balance: self.balance,
            });
        }
        self.balance -= amount;
        tracing::info!("Wallet debited {}, balance {}", amount, self.balance);
        Ok(self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_availability() {
        assert!(PaymentMethod::Wallet.is_available(32, 32));
        assert!(PaymentMethod::Wallet.is_available(32, 2500));
        assert!(!PaymentMethod::Wallet.is_available(112, 100));
        assert!(PaymentMethod::Upi.is_available(112, 0));
        assert!(PaymentMethod::Card.is_available(112, 0));
    }

    #[test]
    fn test_ensure_available_reports_totals() {
        assert_eq!(
            PaymentMethod::Wallet.ensure_available(112, 100),
            Err(BookingError::PaymentMethodUnavailable {
                method: PaymentMethod::Wallet,
                total: 112,
                balance: 100,
            })
        );
    }

    #[test]
    fn test_payment_options() {
        let options = payment_options(500, 0);
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].method, PaymentMethod::Wallet);
        assert!(!options[0].available);
        assert!(options[1].available);
        assert!(options[2].available);
    }

    #[test]
    fn test_top_up_and_debit() {
        let mut wallet = Wallet::new(500);
        assert_eq!(wallet.top_up(1000), Ok(1500));
        assert_eq!(wallet.debit(112), Ok(1388));
        assert_eq!(
            wallet.debit(5000),
            Err(BookingError::InsufficientBalance {
                requested: 5000,
                balance: 1388
            })
        );
        assert!(matches!(
            wallet.top_up(0),
            Err(BookingError::InvalidInput { .. })
        ));
        assert_eq!(wallet.balance(), 1388);
    }
}
