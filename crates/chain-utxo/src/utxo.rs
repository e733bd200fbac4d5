use log::debug;

use crate::error::UtxoError;

/// A single unspent transaction output (UTXO).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    /// Transaction ID as a hex string (big-endian / display order).
    pub txid: String,
    /// Output index within the transaction.
    pub vout: u32,
    /// Value in satoshis.
    pub value_sat: u64,
    /// The locking script (scriptPubKey) serialized bytes.
    pub script_pubkey: Vec<u8>,
    /// Confirmation count, when the explorer reported one.
    pub confirmations: Option<u32>,
}

/// Result of UTXO selection: the chosen UTXOs and their aggregate value.
#[derive(Debug, Clone)]
pub struct UtxoSelection {
    /// The selected UTXOs, largest first.
    pub selected: Vec<Utxo>,
    /// Total value of the selected UTXOs in satoshis.
    pub total_sat: u64,
}

/// Sum of UTXO values, failing on overflow.
pub fn total_value(utxos: &[Utxo]) -> Result<u64, UtxoError> {
    utxos.iter().try_fold(0u64, |acc, u| {
        acc.checked_add(u.value_sat)
            .ok_or_else(|| UtxoError::TransactionBuildError("UTXO total overflows u64".into()))
    })
}

/// Select UTXOs covering `total_needed` satoshis (amount + fee + dev fee).
///
/// UTXOs are ordered by value, largest first (ties keep their input order).
/// If the largest one covers the target on its own it is spent alone;
/// otherwise UTXOs are accumulated in that order until the running sum
/// reaches the target.
pub fn select_utxos(utxos: &[Utxo], total_needed: u64) -> Result<UtxoSelection, UtxoError> {
    if utxos.is_empty() {
        return Err(UtxoError::TransactionBuildError("no UTXOs available".into()));
    }

    let available = total_value(utxos)?;

    let mut sorted: Vec<&Utxo> = utxos.iter().collect();
    sorted.sort_by(|a, b| b.value_sat.cmp(&a.value_sat));

    if let Some(largest) = sorted.first().filter(|u| u.value_sat >= total_needed) {
        debug!(
            "selected single UTXO {}:{} ({} sat) for {} sat",
            largest.txid, largest.vout, largest.value_sat, total_needed
        );
        return Ok(UtxoSelection {
            selected: vec![(*largest).clone()],
            total_sat: largest.value_sat,
        });
    }

    let mut selected = Vec::new();
    let mut total_sat: u64 = 0;
    for utxo in sorted {
        selected.push(utxo.clone());
        // Cannot overflow: bounded by `available`.
        total_sat += utxo.value_sat;
        if total_sat >= total_needed {
            debug!(
                "selected {} UTXOs totalling {} sat for {} sat",
                selected.len(),
                total_sat,
                total_needed
            );
            return Ok(UtxoSelection { selected, total_sat });
        }
    }

    Err(UtxoError::InsufficientFunds {
        available,
        required: total_needed,
    })
}

/// Which UTXOs are eligible for spending at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpendFilter {
    /// UTXOs worth this much or less are skipped.
    pub min_value_sat: u64,
    /// Minimum confirmations; UTXOs with an unknown count are kept.
    pub min_confirmations: u32,
}

impl Default for SpendFilter {
    /// Skip anything worth 0.01 coin or less, no confirmation floor.
    fn default() -> Self {
        SpendFilter {
            min_value_sat: 1_000_000,
            min_confirmations: 0,
        }
    }
}

impl SpendFilter {
    /// A filter that lets every UTXO through.
    pub fn none() -> Self {
        SpendFilter {
            min_value_sat: 0,
            min_confirmations: 0,
        }
    }

    pub fn accepts(&self, utxo: &Utxo) -> bool {
        let big_enough = self.min_value_sat == 0 || utxo.value_sat > self.min_value_sat;
        let confirmed = match utxo.confirmations {
            Some(c) => c >= self.min_confirmations,
            None => true,
        };
        big_enough && confirmed
    }
}

/// Keep the UTXOs `filter` accepts, preserving order.
pub fn filter_spendable(utxos: &[Utxo], filter: &SpendFilter) -> Vec<Utxo> {
    let kept: Vec<Utxo> = utxos.iter().filter(|u| filter.accepts(u)).cloned().collect();
    if kept.len() != utxos.len() {
        debug!(
            "spend filter skipped {} of {} UTXOs",
            utxos.len() - kept.len(),
            utxos.len()
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    fn make_utxo(txid: &str, vout: u32, value_sat: u64) -> Utxo {
        Utxo {
            txid: txid.to_string(),
            vout,
            value_sat,
            script_pubkey: vec![0xaa; 25],
            confirmations: None,
        }
    }

    #[test]
    fn selects_single_large_utxo() {
        let utxos = vec![make_utxo("aaaa", 0, 100_000), make_utxo("bbbb", 0, 50_000)];
        let selection = select_utxos(&utxos, 40_000).unwrap();
        assert_eq!(selection.selected.len(), 1);
        assert_eq!(selection.total_sat, 100_000);
    }

    #[test]
    fn exact_match_on_largest_is_enough() {
        let utxos = vec![make_utxo("a", 0, 70_000), make_utxo("b", 0, 30_000)];
        let selection = select_utxos(&utxos, 70_000).unwrap();
        assert_eq!(selection.selected.len(), 1);
        assert_eq!(selection.selected[0].txid, "a");
    }

    #[test]
    fn accumulates_largest_first() {
        let utxos = vec![
            make_utxo("small", 0, 10_000),
            make_utxo("large", 0, 40_000),
            make_utxo("medium", 0, 30_000),
        ];
        let selection = select_utxos(&utxos, 65_000).unwrap();
        let ids: Vec<&str> = selection.selected.iter().map(|u| u.txid.as_str()).collect();
        assert_eq!(ids, ["large", "medium"]);
        assert_eq!(selection.total_sat, 70_000);
    }

    #[test]
    fn equal_values_keep_input_order() {
        let utxos = vec![
            make_utxo("first", 0, 30_000),
            make_utxo("second", 1, 30_000),
            make_utxo("third", 2, 30_000),
        ];
        let selection = select_utxos(&utxos, 55_000).unwrap();
        assert_eq!(selection.selected[0].txid, "first");
        assert_eq!(selection.selected[1].txid, "second");
    }

    #[test]
    fn insufficient_funds_reports_totals() {
        let utxos = vec![make_utxo("aaaa", 0, 1_000), make_utxo("bbbb", 1, 2_000)];
        let err = select_utxos(&utxos, 500_000).unwrap_err();
        match err {
            UtxoError::InsufficientFunds {
                available,
                required,
            } => {
                assert_eq!(available, 3_000);
                assert_eq!(required, 500_000);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_utxos_returns_error() {
        assert!(select_utxos(&[], 1_000).is_err());
    }

    #[test]
    fn total_value_detects_overflow() {
        let utxos = vec![make_utxo("a", 0, u64::MAX), make_utxo("b", 0, 1)];
        assert!(total_value(&utxos).is_err());
        assert!(select_utxos(&utxos, 10).is_err());
    }

    #[test]
    fn default_filter_skips_hundredth_of_a_coin() {
        let utxos = vec![
            make_utxo("dust", 0, 1_000_000),
            make_utxo("ok", 0, 1_000_001),
        ];
        let kept = filter_spendable(&utxos, &SpendFilter::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].txid, "ok");
    }

    #[test]
    fn confirmation_floor_keeps_unknown_counts() {
        let mut young = make_utxo("young", 0, 5_000_000);
        young.confirmations = Some(1);
        let mut old = make_utxo("old", 0, 5_000_000);
        old.confirmations = Some(10);
        let unknown = make_utxo("unknown", 0, 5_000_000);

        let filter = SpendFilter {
            min_value_sat: 0,
            min_confirmations: 6,
        };
        let kept = filter_spendable(&[young, old, unknown], &filter);
        let ids: Vec<&str> = kept.iter().map(|u| u.txid.as_str()).collect();
        assert_eq!(ids, ["old", "unknown"]);
    }

    #[test]
    fn none_filter_accepts_everything() {
        let utxos = vec![make_utxo("a", 0, 1), make_utxo("b", 0, 0)];
        assert_eq!(filter_spendable(&utxos, &SpendFilter::none()).len(), 2);
    }

    #[quickcheck]
    fn selection_covers_target_and_is_minimal(values: Vec<u32>, target: u32) -> TestResult {
        if values.is_empty() {
            return TestResult::discard();
        }
        let utxos: Vec<Utxo> = values
            .iter()
            .enumerate()
            .map(|(i, v)| make_utxo(&format!("{i:064x}"), 0, u64::from(*v)))
            .collect();
        let target = u64::from(target);
        let available: u64 = utxos.iter().map(|u| u.value_sat).sum();

        match select_utxos(&utxos, target) {
            Ok(sel) => {
                let sum: u64 = sel.selected.iter().map(|u| u.value_sat).sum();
                let last = sel.selected.last().map_or(0, |u| u.value_sat);
                TestResult::from_bool(
                    sum == sel.total_sat && sum >= target && sum - last < target.max(1),
                )
            }
            Err(UtxoError::InsufficientFunds { .. }) => TestResult::from_bool(available < target),
            Err(_) => TestResult::failed(),
        }
    }
}
