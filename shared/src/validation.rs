//! Write-time validation rules.
//!
//! The same rules run twice: in the client before a form is submitted, and in
//! the backend before anything is written. A malformed transaction (missing
//! payer, empty members, non-positive amount) therefore never reaches the
//! balance aggregator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::money::exceeds_cent_precision;

/// Limits applied by the validation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationLimits {
    pub max_amount: Decimal,
    pub max_remark_length: usize,
    pub min_name_length: usize,
    pub max_name_length: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_amount: Decimal::new(1_000_000, 0),
            max_remark_length: 256,
            min_name_length: 2,
            max_name_length: 64,
        }
    }
}

/// Specific validation failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", content = "detail", rename_all = "snake_case")]
pub enum ValidationError {
    MissingPayer,
    MissingReceiver,
    InvalidId(String),
    UnknownUser(String),
    EmptyAmount,
    InvalidAmountFormat(String),
    AmountNotPositive,
    AmountTooLarge(Decimal),
    AmountPrecisionTooHigh,
    EmptyMembers,
    RemarkTooLong(usize),
    NameTooShort(usize),
    NameTooLong(usize),
    InvalidEmail,
    SelfPayment,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingPayer => write!(f, "Please select a payer"),
            ValidationError::MissingReceiver => write!(f, "Please select a receiver"),
            ValidationError::InvalidId(id) => write!(f, "Invalid id: {}", id),
            ValidationError::UnknownUser(id) => write!(f, "Unknown user: {}", id),
            ValidationError::EmptyAmount => write!(f, "Amount is required"),
            ValidationError::InvalidAmountFormat(input) => {
                write!(f, "Amount must be a number, got '{}'", input)
            }
            ValidationError::AmountNotPositive => write!(f, "Amount must be a positive number"),
            ValidationError::AmountTooLarge(max) => write!(f, "Amount cannot exceed {}", max),
            ValidationError::AmountPrecisionTooHigh => {
                write!(f, "Amount can have at most 2 decimal places")
            }
            ValidationError::EmptyMembers => write!(f, "Please select at least one member"),
            ValidationError::RemarkTooLong(len) => {
                write!(f, "Remark is too long ({} characters)", len)
            }
            ValidationError::NameTooShort(min) => {
                write!(f, "Name must be at least {} characters long", min)
            }
            ValidationError::NameTooLong(max) => {
                write!(f, "Name must be at most {} characters long", max)
            }
            ValidationError::InvalidEmail => write!(f, "Email address is not valid"),
            ValidationError::SelfPayment => write!(f, "Payer and receiver must be different users"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation failure attached to the form field that caused it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub error: ValidationError,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, error: ValidationError) -> Self {
        let message = error.to_string();
        Self {
            field: field.to_string(),
            error,
            message,
        }
    }
}

/// Structurally valid transaction input with parsed ids
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTransaction {
    pub payer_id: Uuid,
    pub amount: Decimal,
    pub members: Vec<Uuid>,
    pub remark: Option<String>,
}

/// Structurally valid payment input with parsed ids
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPayment {
    pub payer_id: Uuid,
    pub receiver_id: Uuid,
    pub amount: Decimal,
    pub remark: Option<String>,
}

pub fn parse_id(raw: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ValidationError::InvalidId(raw.to_string()))
}

pub fn check_amount(amount: Decimal, limits: &ValidationLimits) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        Err(ValidationError::AmountNotPositive)
    } else if amount > limits.max_amount {
        Err(ValidationError::AmountTooLarge(limits.max_amount))
    } else if exceeds_cent_precision(amount) {
        Err(ValidationError::AmountPrecisionTooHigh)
    } else {
        Ok(())
    }
}

/// Trim a remark; blank remarks become `None`
pub fn normalize_remark(
    remark: Option<&str>,
    limits: &ValidationLimits,
) -> Result<Option<String>, ValidationError> {
    match remark.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => {
            let len = text.chars().count();
            if len > limits.max_remark_length {
                Err(ValidationError::RemarkTooLong(len))
            } else {
                Ok(Some(text.to_string()))
            }
        }
    }
}

pub fn normalize_name(name: &str, limits: &ValidationLimits) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len < limits.min_name_length {
        Err(ValidationError::NameTooShort(limits.min_name_length))
    } else if len > limits.max_name_length {
        Err(ValidationError::NameTooLong(limits.max_name_length))
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn normalize_email(email: Option<&str>) -> Result<Option<String>, ValidationError> {
    match email.map(str::trim) {
        None | Some("") => Ok(None),
        Some(address) => {
            let valid = match address.split_once('@') {
                Some((local, domain)) => {
                    !local.is_empty()
                        && !domain.contains('@')
                        && domain
                            .split_once('.')
                            .map_or(false, |(host, tld)| !host.is_empty() && !tld.is_empty())
                }
                None => false,
            };
            if valid {
                Ok(Some(address.to_string()))
            } else {
                Err(ValidationError::InvalidEmail)
            }
        }
    }
}

/// Parse a free-form amount typed by a user (`"₹1,200.50"`, `" 12 "`)
pub fn parse_amount_input(input: &str, currency_symbol: &str) -> Result<Decimal, ValidationError> {
    let cleaned: String = input
        .trim()
        .replace(currency_symbol, "")
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(ValidationError::EmptyAmount);
    }

    Decimal::from_str(&cleaned).map_err(|_| ValidationError::InvalidAmountFormat(input.to_string()))
}

/// Validate everything about a transaction that does not need the user store.
/// Duplicate members are collapsed, keeping the first occurrence.
pub fn validate_transaction_input(
    payer_id: &str,
    amount: Decimal,
    members: &[String],
    remark: Option<&str>,
    limits: &ValidationLimits,
) -> Result<ValidatedTransaction, Vec<FieldError>> {
    let mut errors = Vec::new();

    let payer = if payer_id.trim().is_empty() {
        errors.push(FieldError::new("payer_id", ValidationError::MissingPayer));
        None
    } else {
        parse_id(payer_id)
            .map_err(|e| errors.push(FieldError::new("payer_id", e)))
            .ok()
    };

    if let Err(e) = check_amount(amount, limits) {
        errors.push(FieldError::new("amount", e));
    }

    let mut parsed_members: Vec<Uuid> = Vec::with_capacity(members.len());
    if members.is_empty() {
        errors.push(FieldError::new("members", ValidationError::EmptyMembers));
    }
    for raw in members {
        match parse_id(raw) {
            Ok(id) if !parsed_members.contains(&id) => parsed_members.push(id),
            Ok(_) => {}
            Err(e) => errors.push(FieldError::new("members", e)),
        }
    }

    let remark = normalize_remark(remark, limits)
        .map_err(|e| errors.push(FieldError::new("remark", e)))
        .ok()
        .flatten();

    match payer {
        Some(payer_id) if errors.is_empty() => Ok(ValidatedTransaction {
            payer_id,
            amount,
            members: parsed_members,
            remark,
        }),
        _ => Err(errors),
    }
}

pub fn validate_payment_input(
    payer_id: &str,
    receiver_id: &str,
    amount: Decimal,
    remark: Option<&str>,
    limits: &ValidationLimits,
) -> Result<ValidatedPayment, Vec<FieldError>> {
    let mut errors = Vec::new();

    let payer = if payer_id.trim().is_empty() {
        errors.push(FieldError::new("payer_id", ValidationError::MissingPayer));
        None
    } else {
        parse_id(payer_id)
            .map_err(|e| errors.push(FieldError::new("payer_id", e)))
            .ok()
    };

    let receiver = if receiver_id.trim().is_empty() {
        errors.push(FieldError::new("receiver_id", ValidationError::MissingReceiver));
        None
    } else {
        parse_id(receiver_id)
            .map_err(|e| errors.push(FieldError::new("receiver_id", e)))
            .ok()
    };

    if let (Some(p), Some(r)) = (payer, receiver) {
        if p == r {
            errors.push(FieldError::new("receiver_id", ValidationError::SelfPayment));
        }
    }

    if let Err(e) = check_amount(amount, limits) {
        errors.push(FieldError::new("amount", e));
    }

    let remark = normalize_remark(remark, limits)
        .map_err(|e| errors.push(FieldError::new("remark", e)))
        .ok()
        .flatten();

    match (payer, receiver) {
        (Some(payer_id), Some(receiver_id)) if errors.is_empty() => Ok(ValidatedPayment {
            payer_id,
            receiver_id,
            amount,
            remark,
        }),
        _ => Err(errors),
    }
}

/// Raw state of the add/edit transaction form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    pub payer_id: String,
    pub amount_input: String,
    pub members: Vec<String>,
    pub remark: String,
}

impl TransactionForm {
    /// Check the form before submission and build the request body.
    pub fn validate(
        &self,
        limits: &ValidationLimits,
        currency_symbol: &str,
    ) -> Result<crate::CreateTransactionRequest, Vec<FieldError>> {
        let amount = match parse_amount_input(&self.amount_input, currency_symbol) {
            Ok(amount) => amount,
            Err(e) => {
                // Still report the other fields alongside the amount problem.
                let mut errors = vec![FieldError::new("amount", e)];
                if let Err(rest) = validate_transaction_input(
                    &self.payer_id,
                    Decimal::ONE,
                    &self.members,
                    Some(&self.remark),
                    limits,
                ) {
                    errors.extend(rest);
                }
                return Err(errors);
            }
        };

        let validated = validate_transaction_input(
            &self.payer_id,
            amount,
            &self.members,
            Some(&self.remark),
            limits,
        )?;

        Ok(crate::CreateTransactionRequest {
            payer_id: validated.payer_id.to_string(),
            amount: validated.amount,
            members: validated.members.iter().map(Uuid::to_string).collect(),
            remark: validated.remark,
        })
    }
}
