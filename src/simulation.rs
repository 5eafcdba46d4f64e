//! Illustrative fee/return calculator.
//!
//! Businesses compare the platform's anticipation rate against a typical bank
//! rate; investors see the monthly gain at a fixed annual return. All rates
//! are constants. Nothing here is a real financial computation.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use crate::format::{format_brl, format_rate};
use crate::lead::UserType;

/// Typical bank anticipation rate, per month.
pub const BANK_MONTHLY_RATE: Decimal = dec!(0.06);
/// Platform anticipation rate, per month.
pub const PLATFORM_MONTHLY_RATE: Decimal = dec!(0.02);
/// Investor return, per year.
pub const INVESTOR_ANNUAL_RATE: Decimal = dec!(0.15);
pub const INVESTOR_BENCHMARK: &str = "13% CDI atual";
pub const INVESTOR_RISK: &str = "Baixo-Médio";

const MONTHLY: &str = "ao mês";
const YEARLY: &str = "ao ano";

/// Business quote: what anticipating `amount` costs here vs. at a bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessQuote {
    pub amount: Decimal,
    pub bank_rate: Decimal,
    pub platform_rate: Decimal,
    pub savings: Decimal,
    pub net_payout: Decimal,
}

/// Investor quote: monthly gain on `amount` at the fixed annual return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestorQuote {
    pub amount: Decimal,
    pub annual_rate: Decimal,
    pub monthly_gain: Decimal,
    pub benchmark: &'static str,
    pub risk: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationResult {
    Business(BusinessQuote),
    Investor(InvestorQuote),
}

/// Compute a quote for `amount`. Returns `None` when `amount <= 0`, in which
/// case the caller keeps whatever result it already had.
pub fn compute_simulation(user_type: UserType, amount: Decimal) -> Option<SimulationResult> {
    if amount <= Decimal::ZERO {
        return None;
    }

    let result = match user_type {
        UserType::Business => SimulationResult::Business(BusinessQuote {
            amount,
            bank_rate: BANK_MONTHLY_RATE,
            platform_rate: PLATFORM_MONTHLY_RATE,
            savings: amount * BANK_MONTHLY_RATE - amount * PLATFORM_MONTHLY_RATE,
            net_payout: amount * (Decimal::ONE - PLATFORM_MONTHLY_RATE),
        }),
        UserType::Investor => SimulationResult::Investor(InvestorQuote {
            amount,
            annual_rate: INVESTOR_ANNUAL_RATE,
            monthly_gain: amount * (INVESTOR_ANNUAL_RATE / dec!(12)),
            benchmark: INVESTOR_BENCHMARK,
            risk: INVESTOR_RISK,
        }),
    };
    Some(result)
}

/// Parse the amount input the way a numeric form field reads: anything that
/// is not a number counts as zero.
pub fn parse_amount(input: &str) -> Decimal {
    input.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

impl SimulationResult {
    pub fn user_type(&self) -> UserType {
        match self {
            Self::Business(_) => UserType::Business,
            Self::Investor(_) => UserType::Investor,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Self::Business(q) => q.amount,
            Self::Investor(q) => q.amount,
        }
    }

    /// The figure the result view leads with: savings for a business,
    /// monthly gain for an investor.
    pub fn headline(&self) -> Decimal {
        match self {
            Self::Business(q) => q.savings,
            Self::Investor(q) => q.monthly_gain,
        }
    }

    /// Snapshot sent along with a lead submission.
    pub fn to_wire(&self) -> Value {
        match self {
            Self::Business(q) => json!({
                "tipo": UserType::Business.as_str(),
                "valor": to_number(q.amount),
                "taxaBanco": format_rate(q.bank_rate, MONTHLY),
                "nossaTaxa": format_rate(q.platform_rate, MONTHLY),
                "economia": to_number(q.savings),
                "valorLiquido": to_number(q.net_payout),
            }),
            Self::Investor(q) => json!({
                "tipo": UserType::Investor.as_str(),
                "valor": to_number(q.amount),
                "retornoAnual": format_rate(q.annual_rate, YEARLY),
                "retornoMensal": to_number(q.monthly_gain),
                "retornoCDI": q.benchmark,
                "risco": q.risk,
            }),
        }
    }

    /// Labelled lines for the result panel, money in pt-BR format.
    pub fn display_lines(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Business(q) => vec![
                ("Banco Tradicional", format_rate(q.bank_rate, MONTHLY)),
                ("TokenBR Legal", format_rate(q.platform_rate, MONTHLY)),
                ("Você Economiza", format!("R$ {}", format_brl(q.savings))),
                ("Valor líquido", format!("R$ {}", format_brl(q.net_payout))),
            ],
            Self::Investor(q) => vec![
                ("Rentabilidade Anual", format_rate(q.annual_rate, YEARLY)),
                ("Comparativo", format!("vs {}", q.benchmark)),
                ("Ganho Mensal", format!("R$ {}", format_brl(q.monthly_gain))),
                ("Risco", q.risk.to_string()),
            ],
        }
    }
}

fn to_number(d: Decimal) -> Value {
    d.to_f64().map(Value::from).unwrap_or(Value::Null)
}

/// Term of the receivable being anticipated. Shown on the business
/// simulator; it does not feed the calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceivableTerm {
    #[default]
    Days30,
    Days60,
    Days90,
    Days120,
}

impl ReceivableTerm {
    pub fn days(&self) -> u32 {
        match self {
            Self::Days30 => 30,
            Self::Days60 => 60,
            Self::Days90 => 90,
            Self::Days120 => 120,
        }
    }

    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            30 => Some(Self::Days30),
            60 => Some(Self::Days60),
            90 => Some(Self::Days90),
            120 => Some(Self::Days120),
            _ => None,
        }
    }
}
