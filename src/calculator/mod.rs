use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::render::escape_html;
use crate::utils::{format_number, format_usd};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Wallet,
    Risk,
    StopLoss,
    Leverage,
    Margin,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Wallet => "wallet",
            Field::Risk => "risk",
            Field::StopLoss => "stop-loss",
            Field::Leverage => "leverage",
            Field::Margin => "margin",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CalculatorError {
    #[error("{field}: {message}")]
    InvalidInput { field: Field, message: String },
}

impl CalculatorError {
    fn invalid(field: Field, message: &str) -> Self {
        Self::InvalidInput {
            field,
            message: message.to_string(),
        }
    }

    pub fn field(&self) -> Field {
        match self {
            Self::InvalidInput { field, .. } => *field,
        }
    }
}

/// Wallet balance in whole dollars. A decimal point is rejected rather than
/// rounded away.
pub fn parse_wallet(raw: &str) -> Result<f64, CalculatorError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CalculatorError::invalid(
            Field::Wallet,
            "Enter wallet balance (whole dollars).",
        ));
    }
    if raw.contains('.') {
        return Err(CalculatorError::invalid(
            Field::Wallet,
            "Wallet must be whole dollars (no decimals).",
        ));
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(CalculatorError::invalid(
            Field::Wallet,
            "Enter a valid whole number greater than 0.",
        )),
    }
}

fn positive(value: f64, field: Field, message: &str) -> Result<f64, CalculatorError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CalculatorError::invalid(field, message))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RiskInputs {
    pub wallet: f64,
    pub risk_pct: f64,
    pub stop_loss_pct: f64,
}

impl RiskInputs {
    pub fn new(wallet: f64, risk_pct: f64, stop_loss_pct: f64) -> Result<Self, CalculatorError> {
        Ok(Self {
            wallet: positive(wallet, Field::Wallet, "Enter a valid whole number greater than 0.")?,
            risk_pct: positive(risk_pct, Field::Risk, "Risk percent must be > 0.")?,
            stop_loss_pct: positive(
                stop_loss_pct,
                Field::StopLoss,
                "Enter a positive stop loss percent.",
            )?,
        })
    }

    pub fn parse(wallet: &str, risk_pct: f64, stop_loss_pct: f64) -> Result<Self, CalculatorError> {
        Self::new(parse_wallet(wallet)?, risk_pct, stop_loss_pct)
    }

    pub fn risk_per_trade(&self) -> f64 {
        self.wallet * self.risk_pct / 100.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LeverageResult {
    #[serde(flatten)]
    pub inputs: RiskInputs,
    pub leverage: f64,
    pub risk_per_trade: f64,
    pub margin: f64,
    pub position_size: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MarginResult {
    #[serde(flatten)]
    pub inputs: RiskInputs,
    pub margin: f64,
    pub risk_per_trade: f64,
    pub roi_pct: f64,
    pub leverage: f64,
}

/// Margin needed so that hitting the stop loses exactly the risk amount:
/// `margin = risk / (leverage * sl%)`.
pub fn fixed_leverage(inputs: &RiskInputs, leverage: f64) -> Result<LeverageResult, CalculatorError> {
    let leverage = positive(
        leverage,
        Field::Leverage,
        "Enter a valid leverage (whole number >= 1).",
    )?;
    let risk = inputs.risk_per_trade();
    let margin = risk * 100.0 / (leverage * inputs.stop_loss_pct);
    Ok(LeverageResult {
        inputs: *inputs,
        leverage,
        risk_per_trade: risk,
        margin,
        position_size: margin * leverage,
    })
}

/// Leverage implied by a fixed margin: `roi = risk / margin * 100`,
/// `leverage = roi / sl%`.
pub fn fixed_margin(inputs: &RiskInputs, margin: f64) -> Result<MarginResult, CalculatorError> {
    let margin = positive(
        margin,
        Field::Margin,
        "Enter a valid margin amount greater than 0.",
    )?;
    let risk = inputs.risk_per_trade();
    let roi_pct = risk / margin * 100.0;
    Ok(MarginResult {
        inputs: *inputs,
        margin,
        risk_per_trade: risk,
        roi_pct,
        leverage: roi_pct / inputs.stop_loss_pct,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Calculation {
    FixedLeverage(LeverageResult),
    FixedMargin(MarginResult),
}

impl Calculation {
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let inputs = match self {
            Calculation::FixedLeverage(r) => &r.inputs,
            Calculation::FixedMargin(r) => &r.inputs,
        };
        let mut rows = vec![
            ("Wallet", format_usd(inputs.wallet)),
            ("Risk %", format!("{}%", format_number(inputs.risk_pct))),
            ("Risk per trade", format_usd(inputs.risk_per_trade())),
        ];
        match self {
            Calculation::FixedLeverage(r) => {
                rows.push(("Leverage", format!("{}\u{d7}", format_number(r.leverage))));
                rows.push(("Stop Loss", format!("{}%", format_number(inputs.stop_loss_pct))));
                rows.push(("Required Margin", format_usd(r.margin)));
                rows.push(("Position Size (approx)", format_usd(r.position_size)));
            }
            Calculation::FixedMargin(r) => {
                rows.push(("Provided Margin", format_usd(r.margin)));
                rows.push(("Stop Loss", format!("{}%", format_number(inputs.stop_loss_pct))));
                rows.push(("ROI", format!("{:.2}%", r.roi_pct)));
                rows.push(("Required Leverage", format!("{:.2}\u{d7}", r.leverage)));
            }
        }
        rows
    }

    /// Formula and worked explanation shown under the result rows.
    pub fn notes(&self) -> Vec<String> {
        match self {
            Calculation::FixedLeverage(r) => vec![
                "Formula: Margin = Risk / (Leverage \u{d7} StopLoss%).".to_string(),
                format!(
                    "Explanation: With {}\u{d7} leverage, using {} margin produces a position of {}. If stop-loss ({}%) is hit, loss \u{2248} {}.",
                    format_number(r.leverage),
                    format_usd(r.margin),
                    format_usd(r.position_size),
                    format_number(r.inputs.stop_loss_pct),
                    format_usd(r.risk_per_trade)
                ),
            ],
            Calculation::FixedMargin(r) => vec![
                format!(
                    "Steps: ROI = (Risk \u{f7} Margin) \u{d7} 100 \u{2192} {:.2}%.",
                    r.roi_pct
                ),
                format!(
                    "Leverage = ROI \u{f7} StopLoss% \u{2192} {:.2}\u{d7}.",
                    r.leverage
                ),
                format!(
                    "Explanation: With {} margin and {:.2}\u{d7}, if stop-loss ({}%) is hit, your loss \u{2248} {}.",
                    format_usd(r.margin),
                    r.leverage,
                    format_number(r.inputs.stop_loss_pct),
                    format_usd(r.risk_per_trade)
                ),
            ],
        }
    }

    pub fn highlight(&self) -> &'static str {
        match self {
            Calculation::FixedLeverage(_) => "Required Margin",
            Calculation::FixedMargin(_) => "Required Leverage",
        }
    }

    pub fn render_html(&self) -> String {
        let highlight = self.highlight();
        let rows: String = self
            .rows()
            .into_iter()
            .map(|(label, value)| {
                if label == highlight {
                    format!(
                        r#"<div class="result-row highlight"><div>{}</div><div><strong>{}</strong></div></div>"#,
                        escape_html(label),
                        escape_html(&value)
                    )
                } else {
                    format!(
                        r#"<div class="result-row"><div>{}</div><div>{}</div></div>"#,
                        escape_html(label),
                        escape_html(&value)
                    )
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        let notes = self
            .notes()
            .iter()
            .map(|line| escape_html(line))
            .collect::<Vec<_>>()
            .join("<br/>\n");
        format!(
            "<div class=\"result-card\">\n<h4>Result</h4>\n{rows}\n<div class=\"muted small result-notes\">\n{notes}\n</div>\n</div>"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fixed_leverage_example() {
        let inputs = RiskInputs::parse("1000", 2.0, 5.0).unwrap();
        let r = fixed_leverage(&inputs, 10.0).unwrap();
        assert!(close(r.risk_per_trade, 20.0));
        assert!(close(r.margin, 40.0));
        assert!(close(r.position_size, 400.0));
    }

    #[test]
    fn fixed_margin_inverts_fixed_leverage() {
        let inputs = RiskInputs::parse("1000", 2.0, 5.0).unwrap();
        let r = fixed_margin(&inputs, 40.0).unwrap();
        assert!(close(r.roi_pct, 50.0));
        assert!(close(r.leverage, 10.0));
    }

    #[test]
    fn wallet_rejects_decimals_and_non_positive() {
        assert_eq!(
            parse_wallet("1000.50").unwrap_err().field(),
            Field::Wallet
        );
        assert!(parse_wallet("0").is_err());
        assert!(parse_wallet("-5").is_err());
        assert!(parse_wallet("abc").is_err());
        assert!(parse_wallet("").is_err());
    }

    #[test]
    fn non_positive_leverage_is_invalid_input() {
        let inputs = RiskInputs::new(1000.0, 2.0, 5.0).unwrap();
        let err = fixed_leverage(&inputs, 0.0).unwrap_err();
        assert_eq!(err.field(), Field::Leverage);
        assert!(fixed_leverage(&inputs, -3.0).is_err());
        assert!(fixed_leverage(&inputs, f64::NAN).is_err());
    }

    #[test]
    fn invalid_shared_inputs_name_the_field() {
        assert_eq!(
            RiskInputs::new(1000.0, 0.0, 5.0).unwrap_err().field(),
            Field::Risk
        );
        assert_eq!(
            RiskInputs::new(1000.0, 2.0, -1.0).unwrap_err().field(),
            Field::StopLoss
        );
    }

    #[test]
    fn rows_highlight_required_margin() {
        let inputs = RiskInputs::new(1000.0, 2.0, 5.0).unwrap();
        let calc = Calculation::FixedLeverage(fixed_leverage(&inputs, 10.0).unwrap());
        let rows = calc.rows();
        assert!(rows.contains(&("Required Margin", "$40".to_string())));
        assert!(rows.contains(&("Position Size (approx)", "$400".to_string())));
        assert!(calc.render_html().contains("<strong>$40</strong>"));
    }

    #[test]
    fn result_card_ends_with_explanation() {
        let inputs = RiskInputs::new(1000.0, 2.0, 5.0).unwrap();
        let calc = Calculation::FixedMargin(fixed_margin(&inputs, 40.0).unwrap());
        let notes = calc.notes();
        assert_eq!(notes[0], "Steps: ROI = (Risk \u{f7} Margin) \u{d7} 100 \u{2192} 50.00%.");
        assert!(notes[2].contains("With $40 margin and 10.00\u{d7}"));
        assert!(notes[2].ends_with("your loss \u{2248} $20."));

        let html = calc.render_html();
        let notes_at = html.find("result-notes").unwrap();
        assert!(notes_at > html.find("Required Leverage").unwrap());
        assert!(html.contains("StopLoss% \u{2192} 10.00\u{d7}.<br/>"));
    }
}
