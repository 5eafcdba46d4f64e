//! Lead profile data model — the two signup variants and their option lists.

use serde::{Deserialize, Serialize};

/// Which side of the marketplace the lead is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    /// A business looking to anticipate receivables.
    #[serde(rename = "empresa")]
    Business,
    /// An individual looking to invest in receivables.
    #[serde(rename = "investidor")]
    Investor,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "empresa",
            Self::Investor => "investidor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "empresa" => Some(Self::Business),
            "investidor" => Some(Self::Investor),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declares a closed option list whose wire value is a fixed string.
macro_rules! option_list {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_str() == s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

option_list! {
    /// Monthly revenue bracket of a business, in BRL.
    RevenueBracket {
        UpTo50k => "0-50k",
        From50kTo200k => "50k-200k",
        From200kTo500k => "200k-500k",
        Above500k => "500k+",
    }
}

option_list! {
    Sector {
        Commerce => "comercio",
        Services => "servicos",
        Industry => "industria",
        Technology => "tecnologia",
        Other => "outros",
    }
}

option_list! {
    /// Monthly income bracket of an investor, in BRL.
    IncomeBracket {
        UpTo5k => "0-5k",
        From5kTo15k => "5k-15k",
        From15kTo30k => "15k-30k",
        Above30k => "30k+",
    }
}

option_list! {
    RiskProfile {
        Conservative => "conservador",
        Moderate => "moderado",
        Aggressive => "arrojado",
    }
}

/// A single editable form field, named by its wire key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    TaxId,
    LegalName,
    MonthlyRevenue,
    Sector,
    FullName,
    NationalId,
    Income,
    RiskProfile,
    Email,
}

impl Field {
    /// The profile variant this field belongs to. `None` for common fields.
    pub fn owner(&self) -> Option<UserType> {
        match self {
            Self::TaxId | Self::LegalName | Self::MonthlyRevenue | Self::Sector => {
                Some(UserType::Business)
            }
            Self::FullName | Self::NationalId | Self::Income | Self::RiskProfile => {
                Some(UserType::Investor)
            }
            Self::Email => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaxId => "cnpj",
            Self::LegalName => "razaoSocial",
            Self::MonthlyRevenue => "faturamento",
            Self::Sector => "setor",
            Self::FullName => "nome",
            Self::NationalId => "cpf",
            Self::Income => "renda",
            Self::RiskProfile => "perfilRisco",
            Self::Email => "email",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields collected from a business. Enumerated fields hold whatever the
/// form sent; the typed accessors recognise the known options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessProfile {
    pub cnpj: String,
    pub legal_name: String,
    pub revenue: String,
    pub sector: String,
}

impl BusinessProfile {
    pub fn revenue_bracket(&self) -> Option<RevenueBracket> {
        RevenueBracket::parse(&self.revenue)
    }

    pub fn sector_option(&self) -> Option<Sector> {
        Sector::parse(&self.sector)
    }
}

/// Fields collected from an individual investor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvestorProfile {
    pub full_name: String,
    pub cpf: String,
    pub income: String,
    pub risk_profile: String,
}

impl InvestorProfile {
    pub fn income_bracket(&self) -> Option<IncomeBracket> {
        IncomeBracket::parse(&self.income)
    }

    pub fn risk_option(&self) -> Option<RiskProfile> {
        RiskProfile::parse(&self.risk_profile)
    }
}

/// The active profile of a lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadProfile {
    Business(BusinessProfile),
    Investor(InvestorProfile),
}

impl LeadProfile {
    pub fn user_type(&self) -> UserType {
        match self {
            Self::Business(_) => UserType::Business,
            Self::Investor(_) => UserType::Investor,
        }
    }
}

/// Form state accumulated while the lead fills in the registration view.
///
/// Both variants are kept so switching back and forth does not lose what was
/// typed; only the variant matching `user_type` is ever read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadDraft {
    pub user_type: Option<UserType>,
    pub business: BusinessProfile,
    pub investor: InvestorProfile,
    pub email: String,
}

/// Why a field update was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRejection {
    NoProfileSelected,
    WrongProfile(UserType),
}

impl LeadDraft {
    /// The active profile, if a type has been selected.
    pub fn profile(&self) -> Option<LeadProfile> {
        match self.user_type? {
            UserType::Business => Some(LeadProfile::Business(self.business.clone())),
            UserType::Investor => Some(LeadProfile::Investor(self.investor.clone())),
        }
    }

    /// Set one field of the active variant. Values are stored as given;
    /// content is never validated here.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<(), FieldRejection> {
        let active = self.user_type.ok_or(FieldRejection::NoProfileSelected)?;
        if let Some(owner) = field.owner() {
            if owner != active {
                return Err(FieldRejection::WrongProfile(active));
            }
        }

        match field {
            Field::TaxId => self.business.cnpj = value.to_string(),
            Field::LegalName => self.business.legal_name = value.to_string(),
            Field::MonthlyRevenue => self.business.revenue = value.to_string(),
            Field::Sector => self.business.sector = value.to_string(),
            Field::FullName => self.investor.full_name = value.to_string(),
            Field::NationalId => self.investor.cpf = value.to_string(),
            Field::Income => self.investor.income = value.to_string(),
            Field::RiskProfile => self.investor.risk_profile = value.to_string(),
            Field::Email => self.email = value.to_string(),
        }
        Ok(())
    }
}
