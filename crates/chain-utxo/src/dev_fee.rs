use log::debug;
use serde::{Deserialize, Serialize};

use crate::amount::SATS_PER_COIN;
use crate::error::UtxoError;
use crate::network::CoinNetwork;

const BASIS_POINTS: u128 = 10_000;

/// What happens to a developer fee that falls under the dust floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DustAction {
    /// Leave the dev fee output out and carry on.
    Omit,
    /// Refuse to build the transaction.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DustFloor {
    pub threshold_sat: u64,
    pub action: DustAction,
}

/// Per-coin developer fee policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DevFeeRule {
    None,
    /// `max(floor(amount * basis_points / 10_000), minimum_sat)`.
    Percentage {
        address: String,
        basis_points: u32,
        #[serde(default)]
        minimum_sat: u64,
        #[serde(default)]
        dust_floor: Option<DustFloor>,
    },
    Flat {
        address: String,
        amount_sat: u64,
        #[serde(default)]
        dust_floor: Option<DustFloor>,
    },
}

/// A computed developer fee. `amount_sat` is zero when no output is added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevFee {
    pub amount_sat: u64,
    pub address: Option<String>,
}

impl DevFee {
    pub fn none() -> Self {
        DevFee {
            amount_sat: 0,
            address: None,
        }
    }

    /// Whether the fee becomes an output of the transaction.
    pub fn included(&self) -> bool {
        self.address.is_some() && self.amount_sat > 0
    }
}

impl DevFeeRule {
    /// Built-in rule for a coin.
    pub fn for_coin(coin: CoinNetwork) -> Self {
        match coin {
            CoinNetwork::Pep => DevFeeRule::Percentage {
                address: "PjH3mdGxpJwuEMP9oeieXf47ygNDEhT2ij".into(),
                basis_points: 10,
                minimum_sat: 1,
                dust_floor: Some(DustFloor {
                    threshold_sat: 1_000,
                    action: DustAction::Omit,
                }),
            },
            CoinNetwork::Gemma => DevFeeRule::Percentage {
                address: "GXm5E26AemfunwcVm6cJUL13GCK7VhhVhS".into(),
                basis_points: 10,
                minimum_sat: 1,
                dust_floor: Some(DustFloor {
                    threshold_sat: 1_000,
                    action: DustAction::Omit,
                }),
            },
            CoinNetwork::Flop => DevFeeRule::Percentage {
                address: "FPsGHvtackmeypdeddhEBpFg6u1KwqXqAc".into(),
                basis_points: 50,
                minimum_sat: SATS_PER_COIN,
                dust_floor: None,
            },
            CoinNetwork::Xbt => DevFeeRule::Percentage {
                address: "1Hjtk8fVKB1ZkeQwE2Eos3Ph6LZyooKszk".into(),
                basis_points: 20,
                minimum_sat: 0,
                dust_floor: Some(DustFloor {
                    threshold_sat: 100_000,
                    action: DustAction::Reject,
                }),
            },
            CoinNetwork::Doge | CoinNetwork::Bbq | CoinNetwork::Lky | CoinNetwork::Trmp => {
                DevFeeRule::None
            }
        }
    }

    pub fn address(&self) -> Option<&str> {
        match self {
            DevFeeRule::None => None,
            DevFeeRule::Percentage { address, .. } | DevFeeRule::Flat { address, .. } => {
                Some(address)
            }
        }
    }

    /// Compute the developer fee for sending `amount_sat`.
    pub fn compute(&self, amount_sat: u64) -> Result<DevFee, UtxoError> {
        let (address, raw, floor) = match self {
            DevFeeRule::None => return Ok(DevFee::none()),
            DevFeeRule::Percentage {
                address,
                basis_points,
                minimum_sat,
                dust_floor,
            } => {
                let pct = u128::from(amount_sat) * u128::from(*basis_points) / BASIS_POINTS;
                // Only exceeds u64 for rates above 100%.
                let pct = u64::try_from(pct).map_err(|_| {
                    UtxoError::InvalidAmount("developer fee overflows u64".into())
                })?;
                (address, pct.max(*minimum_sat), dust_floor)
            }
            DevFeeRule::Flat {
                address,
                amount_sat: flat,
                dust_floor,
            } => (address, *flat, dust_floor),
        };

        if let Some(floor) = floor {
            match floor.action {
                DustAction::Reject if raw == 0 => {
                    return Err(UtxoError::DevFeeRejected(
                        "developer fee is zero; amount may be too small".into(),
                    ));
                }
                DustAction::Reject if raw < floor.threshold_sat => {
                    return Err(UtxoError::DevFeeRejected(format!(
                        "developer fee ({raw} satoshis) is below dust threshold ({} satoshis)",
                        floor.threshold_sat
                    )));
                }
                DustAction::Omit if raw < floor.threshold_sat => {
                    debug!(
                        "developer fee {raw} sat below dust threshold {} sat, omitted",
                        floor.threshold_sat
                    );
                    return Ok(DevFee::none());
                }
                _ => {}
            }
        }

        if raw == 0 {
            return Ok(DevFee::none());
        }

        Ok(DevFee {
            amount_sat: raw,
            address: Some(address.clone()),
        })
    }
}
