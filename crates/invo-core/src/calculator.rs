//! # Line-Item Calculator
//!
//! Turns requested lines into per-line amounts and invoice totals.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  per line                                                               │
//! │    gross          = rate × quantity                                     │
//! │    after_discount = gross − discount                                    │
//! │    line_tax       = after_discount × tax_rate   (rounded half up)       │
//! │    line_total     = after_discount + line_tax                           │
//! │                                                                         │
//! │  per invoice                                                            │
//! │    subtotal = Σ after_discount                                          │
//! │    tax      = Σ line_tax                                                │
//! │    total    = subtotal + tax        (== Σ line_total, exactly)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tax is rounded once per line. The invoice tax is the sum of the rounded
//! line taxes, never a re-rounding of the subtotal.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LineItemRequest, TaxRate};
use crate::{MAX_ITEM_QUANTITY, MAX_LINE_ITEMS};

// =============================================================================
// Types
// =============================================================================

/// The numeric part of one requested line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInput {
    pub rate: Money,
    pub quantity: i64,
    pub discount: Money,
    pub tax_rate: TaxRate,
}

impl LineInput {
    pub const fn new(rate: Money, quantity: i64, discount: Money, tax_rate: TaxRate) -> Self {
        LineInput {
            rate,
            quantity,
            discount,
            tax_rate,
        }
    }
}

impl From<&LineItemRequest> for LineInput {
    fn from(req: &LineItemRequest) -> Self {
        LineInput::new(
            Money::from_cents(req.rate_cents),
            req.quantity,
            Money::from_cents(req.discount_cents),
            TaxRate::from_bps(req.tax_rate_bps),
        )
    }
}

/// Computed amounts of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAmounts {
    pub after_discount: Money,
    pub tax: Money,
    pub total: Money,
}

/// Aggregates over all lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

/// Per-line amounts in request order, plus the totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculation {
    pub lines: Vec<LineAmounts>,
    pub totals: InvoiceTotals,
}

// =============================================================================
// Calculation
// =============================================================================

/// Calculates a single line.
///
/// ## Rules
/// - `quantity` in `1..=MAX_ITEM_QUANTITY`
/// - `rate >= 0`
/// - `0 <= discount <= rate × quantity`
/// - `tax_rate <= 100%`
pub fn calculate_line(input: &LineInput) -> Result<LineAmounts, ValidationError> {
    calculate_line_named(input, "")
}

/// Calculates every line and the invoice totals.
///
/// Fails on the first invalid line. Error fields are named after the line
/// position, e.g. `items[2].discount_cents`.
///
/// ## Example
/// ```rust
/// use invo_core::calculator::{calculate_invoice, LineInput};
/// use invo_core::money::Money;
/// use invo_core::types::TaxRate;
///
/// let lines = [
///     LineInput::new(Money::from_cents(1_000), 2, Money::zero(), TaxRate::from_bps(1_800)),
///     LineInput::new(Money::from_cents(500), 1, Money::zero(), TaxRate::zero()),
/// ];
/// let calc = calculate_invoice(&lines).unwrap();
///
/// assert_eq!(calc.totals.subtotal.cents(), 2_500);
/// assert_eq!(calc.totals.tax.cents(), 360);
/// assert_eq!(calc.totals.total.cents(), 2_860);
/// ```
pub fn calculate_invoice(lines: &[LineInput]) -> Result<Calculation, ValidationError> {
    if lines.is_empty() {
        return Err(ValidationError::EmptyInvoice);
    }
    if lines.len() > MAX_LINE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_LINE_ITEMS as i64,
        });
    }

    let mut amounts = Vec::with_capacity(lines.len());
    let mut totals = InvoiceTotals::default();

    for (idx, line) in lines.iter().enumerate() {
        let line_amounts = calculate_line_named(line, &format!("items[{idx}]."))?;

        totals.subtotal = totals
            .subtotal
            .checked_add(line_amounts.after_discount)
            .ok_or_else(|| overflow("subtotal"))?;
        totals.tax = totals
            .tax
            .checked_add(line_amounts.tax)
            .ok_or_else(|| overflow("tax"))?;

        amounts.push(line_amounts);
    }

    totals.total = totals
        .subtotal
        .checked_add(totals.tax)
        .ok_or_else(|| overflow("total"))?;

    Ok(Calculation {
        lines: amounts,
        totals,
    })
}

fn calculate_line_named(input: &LineInput, prefix: &str) -> Result<LineAmounts, ValidationError> {
    let field = |name: &str| format!("{prefix}{name}");

    if input.quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field("quantity"),
        });
    }
    if input.quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field("quantity"),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    if input.rate.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field("rate_cents"),
            min: 0,
            max: i64::MAX,
        });
    }
    if input.tax_rate.bps() > TaxRate::MAX_BPS {
        return Err(ValidationError::OutOfRange {
            field: field("tax_rate_bps"),
            min: 0,
            max: TaxRate::MAX_BPS as i64,
        });
    }

    let gross = input
        .rate
        .checked_multiply_quantity(input.quantity)
        .ok_or_else(|| overflow(&field("rate_cents")))?;

    if input.discount.is_negative() || input.discount > gross {
        return Err(ValidationError::OutOfRange {
            field: field("discount_cents"),
            min: 0,
            max: gross.cents(),
        });
    }

    let after_discount = gross - input.discount;
    let tax = after_discount.calculate_tax(input.tax_rate);
    let total = after_discount
        .checked_add(tax)
        .ok_or_else(|| overflow(&field("line_total")))?;

    Ok(LineAmounts {
        after_discount,
        tax,
        total,
    })
}

fn overflow(field: &str) -> ValidationError {
    ValidationError::AmountOverflow {
        field: field.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line(rate: i64, qty: i64, discount: i64, bps: u32) -> LineInput {
        LineInput::new(
            Money::from_cents(rate),
            qty,
            Money::from_cents(discount),
            TaxRate::from_bps(bps),
        )
    }

    #[test]
    fn test_reference_line() {
        // 100.00 × 3 − 50.00 at 10%
        let amounts = calculate_line(&line(10_000, 3, 5_000, 1_000)).unwrap();
        assert_eq!(amounts.after_discount.cents(), 25_000);
        assert_eq!(amounts.tax.cents(), 2_500);
        assert_eq!(amounts.total.cents(), 27_500);
    }

    #[test]
    fn test_zero_rate_and_zero_tax() {
        let amounts = calculate_line(&line(0, 5, 0, 0)).unwrap();
        assert_eq!(amounts.total, Money::zero());
    }

    #[test]
    fn test_full_discount() {
        let amounts = calculate_line(&line(1_000, 2, 2_000, 1_800)).unwrap();
        assert_eq!(amounts.after_discount, Money::zero());
        assert_eq!(amounts.tax, Money::zero());
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        for qty in [0, -1] {
            let err = calculate_line(&line(1_000, qty, 0, 0)).unwrap_err();
            assert!(matches!(err, ValidationError::MustBePositive { .. }));
        }
    }

    #[test]
    fn test_rejects_excessive_quantity() {
        let err = calculate_line(&line(1, MAX_ITEM_QUANTITY + 1, 0, 0)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn test_rejects_negative_rate() {
        let err = calculate_line(&line(-100, 1, 0, 0)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "rate_cents"));
    }

    #[test]
    fn test_rejects_bad_discount() {
        let err = calculate_line(&line(1_000, 1, -1, 0)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { ref field, .. } if field == "discount_cents"));

        let err = calculate_line(&line(1_000, 1, 1_001, 0)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { max: 1_000, .. }));
    }

    #[test]
    fn test_rejects_tax_over_hundred_percent() {
        assert!(calculate_line(&line(1_000, 1, 0, 10_000)).is_ok());
        assert!(calculate_line(&line(1_000, 1, 0, 10_001)).is_err());
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = calculate_line(&line(i64::MAX / 2, 3, 0, 0)).unwrap_err();
        assert!(matches!(err, ValidationError::AmountOverflow { .. }));
    }

    #[test]
    fn test_invoice_totals() {
        let calc = calculate_invoice(&[
            line(10_000, 3, 5_000, 1_000), // 25000 + 2500
            line(999, 1, 0, 1_800),        // 999 + 179.82 → 180
        ])
        .unwrap();

        assert_eq!(calc.lines.len(), 2);
        assert_eq!(calc.lines[1].tax.cents(), 180);
        assert_eq!(calc.totals.subtotal.cents(), 25_999);
        assert_eq!(calc.totals.tax.cents(), 2_680);
        assert_eq!(calc.totals.total.cents(), 28_679);
    }

    #[test]
    fn test_empty_invoice_rejected() {
        assert!(matches!(
            calculate_invoice(&[]).unwrap_err(),
            ValidationError::EmptyInvoice
        ));
    }

    #[test]
    fn test_too_many_lines_rejected() {
        let lines = vec![line(100, 1, 0, 0); MAX_LINE_ITEMS + 1];
        assert!(calculate_invoice(&lines).is_err());

        let lines = vec![line(100, 1, 0, 0); MAX_LINE_ITEMS];
        assert!(calculate_invoice(&lines).is_ok());
    }

    #[test]
    fn test_error_names_the_line() {
        let err = calculate_invoice(&[line(100, 1, 0, 0), line(100, 0, 0, 0)]).unwrap_err();
        assert_eq!(err.to_string(), "items[1].quantity must be positive");
    }

    fn arb_line() -> impl Strategy<Value = LineInput> {
        (0i64..10_000_000, 1i64..10_000, 0u32..=10_000, 0u32..=100).prop_map(
            |(rate, qty, bps, discount_pct)| {
                let gross = rate * qty;
                let discount = gross * discount_pct as i64 / 100;
                line(rate, qty, discount, bps)
            },
        )
    }

    proptest! {
        #[test]
        fn prop_total_is_subtotal_plus_tax(lines in prop::collection::vec(arb_line(), 1..20)) {
            let calc = calculate_invoice(&lines).unwrap();
            prop_assert_eq!(calc.totals.total, calc.totals.subtotal + calc.totals.tax);
        }

        #[test]
        fn prop_total_is_sum_of_line_totals(lines in prop::collection::vec(arb_line(), 1..20)) {
            let calc = calculate_invoice(&lines).unwrap();
            let summed: Money = calc.lines.iter().map(|l| l.total).sum();
            prop_assert_eq!(calc.totals.total, summed);
        }

        #[test]
        fn prop_line_amounts_are_bounded(input in arb_line()) {
            let amounts = calculate_line(&input).unwrap();
            prop_assert!(!amounts.after_discount.is_negative());
            prop_assert!(amounts.tax <= amounts.after_discount);
            prop_assert!(amounts.after_discount <= input.rate * input.quantity);
        }
    }
}
