use log::debug;

use crate::dev_fee::DevFee;
use crate::error::UtxoError;
use crate::utxo::{select_utxos, Utxo, UtxoSelection};

/// Default change dust threshold; smaller change is left to the miner.
pub const DEFAULT_CHANGE_DUST_SAT: u64 = 546;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputRole {
    Recipient,
    DevFee,
    Change,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOutput {
    pub address: String,
    pub amount_sat: u64,
    pub role: OutputRole,
}

/// Inputs and outputs of a spend, decided before any transaction exists.
#[derive(Debug, Clone)]
pub struct SpendPlan {
    pub selection: UtxoSelection,
    /// Recipient first, then the dev fee (if any), then change (if any).
    pub outputs: Vec<PlannedOutput>,
    /// Fee the caller asked for.
    pub fee_sat: u64,
    pub dev_fee: DevFee,
    /// Change paid back to the sender; zero if none.
    pub change_sat: u64,
    /// Change too small to be worth an output, added to the miner fee.
    pub absorbed_change_sat: u64,
}

impl SpendPlan {
    /// Select inputs for `amount_sat + fee_sat + dev_fee` and lay out outputs.
    pub fn new(
        utxos: &[Utxo],
        recipient: &str,
        amount_sat: u64,
        fee_sat: u64,
        dev_fee: DevFee,
        change_address: &str,
        change_dust_sat: u64,
    ) -> Result<Self, UtxoError> {
        if amount_sat == 0 {
            return Err(UtxoError::InvalidAmount(
                "amount must be greater than zero".into(),
            ));
        }

        let total_needed = amount_sat
            .checked_add(fee_sat)
            .and_then(|v| v.checked_add(dev_fee.amount_sat))
            .ok_or_else(|| UtxoError::InvalidAmount("amount + fee overflows u64".into()))?;

        let selection = select_utxos(utxos, total_needed)?;

        let remainder = selection.total_sat.checked_sub(total_needed).ok_or_else(|| {
            UtxoError::TransactionBuildError(format!(
                "negative change: inputs {} sat < required {} sat",
                selection.total_sat, total_needed
            ))
        })?;

        let mut outputs = vec![PlannedOutput {
            address: recipient.to_string(),
            amount_sat,
            role: OutputRole::Recipient,
        }];

        if let Some(address) = dev_fee.address.as_ref().filter(|_| dev_fee.included()) {
            outputs.push(PlannedOutput {
                address: address.clone(),
                amount_sat: dev_fee.amount_sat,
                role: OutputRole::DevFee,
            });
        }

        let (change_sat, absorbed_change_sat) = if remainder > change_dust_sat {
            outputs.push(PlannedOutput {
                address: change_address.to_string(),
                amount_sat: remainder,
                role: OutputRole::Change,
            });
            (remainder, 0)
        } else {
            if remainder > 0 {
                debug!("change of {remainder} sat is dust, added to the fee");
            }
            (0, remainder)
        };

        Ok(SpendPlan {
            selection,
            outputs,
            fee_sat,
            dev_fee,
            change_sat,
            absorbed_change_sat,
        })
    }

    /// What the miner actually receives: inputs minus outputs.
    pub fn effective_fee_sat(&self) -> u64 {
        self.fee_sat + self.absorbed_change_sat
    }

    pub fn total_output_sat(&self) -> u64 {
        self.outputs.iter().map(|o| o.amount_sat).sum()
    }

    pub fn output(&self, role: OutputRole) -> Option<&PlannedOutput> {
        self.outputs.iter().find(|o| o.role == role)
    }
}
