//! Transfer-chain authorization policy
//!
//! Pure function of (merged view, caller identity, optional consumer
//! address). The chain is fixed: manufacturer hands to the assigned
//! wholesaler, the wholesaler to the assigned retailer, the retailer to a
//! caller-supplied consumer. Identity comparison is case-sensitive string
//! equality; addresses coming out of the ledger client are checksummed and
//! callers are expected to pass the same form.

use crate::models::merged::MergedProductView;

/// Error types for transfer authorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The caller does not hold the product
    NotCurrentOwner,
    /// The caller is the assigned retailer but supplied no consumer address
    MissingConsumerAddress,
    /// The caller matches no step of the transfer chain
    Unauthorized,
}

impl std::fmt::Display for TransferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferError::NotCurrentOwner => {
                write!(f, "Caller is not the current owner of the product")
            }
            TransferError::MissingConsumerAddress => {
                write!(f, "Consumer wallet address is required for the final transfer")
            }
            TransferError::Unauthorized => {
                write!(f, "Caller matches no role in the transfer chain")
            }
        }
    }
}

impl std::error::Error for TransferError {}

/// Determine the next authorized recipient for a transfer requested by
/// `caller`. No network access; callers validate and submit separately.
pub fn next_recipient(
    view: &MergedProductView,
    caller: &str,
    consumer_address: Option<&str>,
) -> Result<String, TransferError> {
    if caller != view.current_owner {
        return Err(TransferError::NotCurrentOwner);
    }

    if caller == view.manufacturer {
        return Ok(view.assigned_wholesaler.clone());
    }

    if caller == view.assigned_wholesaler {
        return Ok(view.assigned_retailer.clone());
    }

    if caller == view.assigned_retailer {
        return match consumer_address {
            Some(consumer) if !consumer.is_empty() => Ok(consumer.to_string()),
            _ => Err(TransferError::MissingConsumerAddress),
        };
    }

    Err(TransferError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::product;

    fn view(current_owner: &str) -> MergedProductView {
        let mut p = product(1, "B1", "0xMANUFACTURER");
        p.current_owner = current_owner.to_string();
        p.assigned_wholesaler = "0xW".to_string();
        p.assigned_retailer = "0xR".to_string();
        MergedProductView::merge(p, None)
    }

    #[test]
    fn manufacturer_hands_to_assigned_wholesaler() {
        let view = view("0xMANUFACTURER");
        let recipient = next_recipient(&view, "0xMANUFACTURER", None).unwrap();
        assert_eq!(recipient, "0xW");
    }

    #[test]
    fn wholesaler_hands_to_assigned_retailer() {
        let view = view("0xW");
        let recipient = next_recipient(&view, "0xW", None).unwrap();
        assert_eq!(recipient, "0xR");
    }

    #[test]
    fn retailer_requires_a_consumer_address() {
        let view = view("0xR");
        assert_eq!(
            next_recipient(&view, "0xR", None),
            Err(TransferError::MissingConsumerAddress)
        );
        assert_eq!(
            next_recipient(&view, "0xR", Some("")),
            Err(TransferError::MissingConsumerAddress)
        );
        assert_eq!(
            next_recipient(&view, "0xR", Some("0xCONSUMER")).unwrap(),
            "0xCONSUMER"
        );
    }

    #[test]
    fn caller_outside_the_chain_is_unauthorized() {
        let view = view("0xSOMEONE");
        assert_eq!(
            next_recipient(&view, "0xSOMEONE", None),
            Err(TransferError::Unauthorized)
        );
    }

    #[test]
    fn non_owner_is_refused_before_role_matching() {
        let view = view("0xW");
        assert_eq!(
            next_recipient(&view, "0xMANUFACTURER", None),
            Err(TransferError::NotCurrentOwner)
        );
    }

    #[test]
    fn identity_comparison_is_case_sensitive() {
        let view = view("0xMANUFACTURER");
        assert_eq!(
            next_recipient(&view, "0xmanufacturer", None),
            Err(TransferError::NotCurrentOwner)
        );
    }
}
