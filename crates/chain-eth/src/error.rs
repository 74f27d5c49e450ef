use thiserror::Error;

/// Ethereum chain operation errors.
#[derive(Debug, Error)]
pub enum EthError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid ABI: {0}")]
    InvalidAbi(String),

    #[error("function not found in ABI: {0}")]
    FunctionNotFound(String),

    #[error("function {0} is not payable")]
    NotPayable(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_address() {
        let err = EthError::InvalidAddress("bad checksum".into());
        assert_eq!(err.to_string(), "invalid address: bad checksum");
    }

    #[test]
    fn display_invalid_amount() {
        let err = EthError::InvalidAmount("too many decimals".into());
        assert_eq!(err.to_string(), "invalid amount: too many decimals");
    }

    #[test]
    fn display_function_not_found() {
        let err = EthError::FunctionNotFound("close".into());
        assert_eq!(err.to_string(), "function not found in ABI: close");
    }

    #[test]
    fn display_not_payable() {
        let err = EthError::NotPayable("withdraw".into());
        assert_eq!(err.to_string(), "function withdraw is not payable");
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(EthError::InvalidAbi("test".into()));
        assert!(err.to_string().contains("test"));
    }
}
