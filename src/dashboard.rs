//! Static mock matches shown on the dashboard view.

use serde::Serialize;

use crate::lead::UserType;

/// Number of match cards the dashboard shows.
pub const MATCH_COUNT: usize = 3;

/// One mocked match: an interested investor (for businesses) or an
/// available receivable (for investors).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCard {
    pub title: String,
    pub detail: String,
    pub rate_label: String,
    pub risk_label: &'static str,
    pub rating: f32,
    pub match_score: u8,
    pub action_label: &'static str,
}

const RISK: [&str; MATCH_COUNT] = ["Baixo risco", "Médio risco", "Baixo risco"];
const RATING: [f32; MATCH_COUNT] = [4.8, 4.6, 4.9];
const SCORE: [u8; MATCH_COUNT] = [98, 95, 99];

const INVESTOR_TIERS: [&str; MATCH_COUNT] = ["Premium", "Gold", "Silver"];
const INVESTOR_AVAILABLE_K: [u32; MATCH_COUNT] = [150, 80, 120];
const INVESTOR_MONTHLY_RATE: [f32; MATCH_COUNT] = [1.8, 2.1, 2.4];

const RECEIVABLE_SECTORS: [&str; MATCH_COUNT] = ["Tecnologia", "Comércio", "Serviços"];
const RECEIVABLE_TERM_DAYS: [u32; MATCH_COUNT] = [30, 45, 60];
const RECEIVABLE_VALUE_K: [u32; MATCH_COUNT] = [75, 120, 90];
const RECEIVABLE_ANNUAL_RATE: [f32; MATCH_COUNT] = [14.5, 16.2, 15.8];

/// The dashboard's matches for a profile type.
pub fn match_cards(user_type: UserType) -> Vec<MatchCard> {
    (0..MATCH_COUNT)
        .map(|i| match user_type {
            UserType::Business => MatchCard {
                title: format!("Investidor {}", INVESTOR_TIERS[i]),
                detail: format!("Disponível para investir: R$ {}.000", INVESTOR_AVAILABLE_K[i]),
                rate_label: format!("{}% a.m.", INVESTOR_MONTHLY_RATE[i]),
                risk_label: RISK[i],
                rating: RATING[i],
                match_score: SCORE[i],
                action_label: "Aceitar Proposta",
            },
            UserType::Investor => MatchCard {
                title: format!("Recebível - {}", RECEIVABLE_SECTORS[i]),
                detail: format!(
                    "Prazo: {} dias • Valor: R$ {}.000",
                    RECEIVABLE_TERM_DAYS[i], RECEIVABLE_VALUE_K[i]
                ),
                rate_label: format!("{}% a.a.", RECEIVABLE_ANNUAL_RATE[i]),
                risk_label: RISK[i],
                rating: RATING[i],
                match_score: SCORE[i],
                action_label: "Investir Agora",
            },
        })
        .collect()
}

/// Dashboard heading for a profile type.
pub fn heading(user_type: UserType) -> &'static str {
    match user_type {
        UserType::Business => "🎯 Investidores Interessados",
        UserType::Investor => "💰 Oportunidades de Investimento",
    }
}
