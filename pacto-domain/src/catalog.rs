//! Static catalogs of favor and reward types.
//!
//! Defined at compile time and never mutated. Records copy the point value
//! and display name at creation, so editing these tables never rewrites
//! history.

use serde::Serialize;

use crate::value_objects::DomainError;

/// A kind of favor ("gesto") a participant can log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FavorType {
    pub id: &'static str,
    pub name: &'static str,
    /// Points earned once approved (1..=3)
    pub points: u32,
}

/// A reward ("canje") points can be redeemed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RewardType {
    pub id: &'static str,
    pub name: &'static str,
    /// Points spent once approved (1..=3)
    pub cost: u32,
}

pub const FAVOR_TYPES: &[FavorType] = &[
    FavorType { id: "foto", name: "Foto linda sin que la pida", points: 1 },
    FavorType { id: "preparar", name: "Preparar/servir algo", points: 1 },
    FavorType { id: "mimos", name: "Mimos", points: 1 },
    FavorType { id: "compu", name: "Prestar compu", points: 1 },
    FavorType { id: "masajes", name: "Masajes 10 min", points: 2 },
    FavorType { id: "actividad", name: "Acompañar a actividad", points: 2 },
    FavorType { id: "pelo", name: "Lavar/secar pelo", points: 2 },
    FavorType { id: "fiaca", name: "Fiaca en cama juntos", points: 2 },
    FavorType { id: "regional", name: "Traer algo regional", points: 2 },
    FavorType { id: "sorpresa", name: "Sorpresa linda", points: 3 },
    FavorType { id: "premium", name: "Servicio premium", points: 3 },
];

pub const REWARD_TYPES: &[RewardType] = &[
    RewardType { id: "alarma", name: "Pospuesto extra alarma", cost: 1 },
    RewardType { id: "bano", name: "10 min extra baño", cost: 1 },
    RewardType { id: "fotos", name: "Sesión fotos sin límite", cost: 2 },
    RewardType { id: "elegir", name: "Elegir actividad del día", cost: 2 },
    RewardType { id: "tarde", name: "Tarde libre", cost: 2 },
    RewardType { id: "notebook", name: "Hora de notebook", cost: 2 },
    RewardType { id: "masajes_largos", name: "Masajes largos ❤️", cost: 3 },
    RewardType { id: "premium_canje", name: "Servicio premium 🔥", cost: 3 },
];

/// Look up a favor type by id
///
/// # Errors
/// Returns `DomainError::UnknownFavorType` if the id is not in the catalog
pub fn favor_type(id: &str) -> Result<&'static FavorType, DomainError> {
    FAVOR_TYPES
        .iter()
        .find(|f| f.id == id)
        .ok_or_else(|| DomainError::UnknownFavorType(id.to_string()))
}

/// Look up a reward type by id
///
/// # Errors
/// Returns `DomainError::UnknownRewardType` if the id is not in the catalog
pub fn reward_type(id: &str) -> Result<&'static RewardType, DomainError> {
    REWARD_TYPES
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| DomainError::UnknownRewardType(id.to_string()))
}
