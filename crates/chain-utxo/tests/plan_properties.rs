//! Property-based tests for spend planning and developer fees.

use chain_utxo::dev_fee::DevFeeRule;
use chain_utxo::network::CoinNetwork;
use chain_utxo::plan::{OutputRole, SpendPlan, DEFAULT_CHANGE_DUST_SAT};
use chain_utxo::utxo::Utxo;
use quickcheck::{Arbitrary, Gen, TestResult};
use quickcheck_macros::quickcheck;

// Up to eight UTXOs of at most 1,000 coins each
#[derive(Clone, Debug)]
struct UtxoSet(Vec<Utxo>);

impl Arbitrary for UtxoSet {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = usize::arbitrary(g) % 8 + 1;
        let utxos = (0..count)
            .map(|i| Utxo {
                txid: format!("{:064x}", i + 1),
                vout: u32::arbitrary(g) % 4,
                value_sat: u64::arbitrary(g) % 100_000_000_000 + 1,
                script_pubkey: vec![0x76, 0xa9],
                confirmations: None,
            })
            .collect();
        UtxoSet(utxos)
    }
}

#[quickcheck]
fn plan_conserves_value(utxos: UtxoSet, amount: u64, fee: u64) -> TestResult {
    let amount = amount % 500_000_000_000 + 1;
    let fee = fee % 10_000_000;
    let dev_fee = match DevFeeRule::for_coin(CoinNetwork::Pep).compute(amount) {
        Ok(fee) => fee,
        Err(_) => return TestResult::discard(),
    };
    let dev_fee_sat = dev_fee.amount_sat;

    let plan = match SpendPlan::new(
        &utxos.0,
        "recipient",
        amount,
        fee,
        dev_fee,
        "change",
        DEFAULT_CHANGE_DUST_SAT,
    ) {
        Ok(plan) => plan,
        Err(_) => return TestResult::discard(),
    };

    let recipient = plan.output(OutputRole::Recipient).map(|o| o.amount_sat);
    let dev = plan.output(OutputRole::DevFee).map_or(0, |o| o.amount_sat);
    TestResult::from_bool(
        plan.selection.total_sat == plan.total_output_sat() + plan.effective_fee_sat()
            && recipient == Some(amount)
            && dev == dev_fee_sat
            && plan.absorbed_change_sat <= DEFAULT_CHANGE_DUST_SAT,
    )
}

#[quickcheck]
fn change_output_is_never_dust(utxos: UtxoSet, amount: u64) -> TestResult {
    let amount = amount % 500_000_000_000 + 1;
    let plan = match SpendPlan::new(
        &utxos.0,
        "recipient",
        amount,
        100_000,
        chain_utxo::dev_fee::DevFee::none(),
        "change",
        DEFAULT_CHANGE_DUST_SAT,
    ) {
        Ok(plan) => plan,
        Err(_) => return TestResult::discard(),
    };
    match plan.output(OutputRole::Change) {
        Some(change) => TestResult::from_bool(change.amount_sat > DEFAULT_CHANGE_DUST_SAT),
        None => TestResult::from_bool(plan.change_sat == 0),
    }
}

#[quickcheck]
fn percentage_dev_fee_is_monotonic(a: u64, b: u64) -> bool {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let rule = DevFeeRule::for_coin(CoinNetwork::Flop);
    match (rule.compute(lo), rule.compute(hi)) {
        (Ok(lo_fee), Ok(hi_fee)) => lo_fee.amount_sat <= hi_fee.amount_sat,
        _ => false,
    }
}

#[quickcheck]
fn pep_dev_fee_is_omitted_or_at_least_floor(amount: u64) -> bool {
    let fee = DevFeeRule::for_coin(CoinNetwork::Pep).compute(amount).unwrap();
    if fee.included() {
        fee.amount_sat >= 1_000 && fee.address.is_some()
    } else {
        fee.amount_sat == 0
    }
}
