use proptest::prelude::*;

use ubi_accrual::{accrue, AccrualEngine, Policy};
use ubi_external::FungibleLedger;
use ubi_nullables::{NullLedger, NullRegistry};
use ubi_types::{Address, Timestamp};

fn engine_with_policy(
    rate: u128,
    from: u64,
    to: u64,
) -> (AccrualEngine<NullRegistry, NullLedger>, NullRegistry) {
    let registry = NullRegistry::new();
    let gov = Address::new("ubi_gov");
    let mut engine = AccrualEngine::new(gov.clone(), registry.clone(), NullLedger::new());
    engine
        .add_policy(&gov, 1, rate, Timestamp::new(from), Timestamp::new(to))
        .unwrap();
    (engine, registry)
}

proptest! {
    /// Splitting a span into many claims pays exactly what one claim over the span pays.
    #[test]
    fn repeated_claims_equal_single_claim(
        rate in 1u128..1_000_000,
        from in 0u64..10_000,
        len in 1u64..100_000,
        start in 0u64..20_000,
        mut steps in prop::collection::vec(0u64..200_000, 1..12),
    ) {
        let to = from + len;
        steps.sort_unstable();
        let end = start + *steps.last().unwrap();
        let alice = Address::new("ubi_alice");

        let (mut split, registry) = engine_with_policy(rate, from, to);
        registry.grant(&alice);
        split.start_accruing(&alice, &alice, Timestamp::new(start)).unwrap();
        let mut paid = 0u128;
        for step in &steps {
            paid += split.mint_accrued(&alice, 1, Timestamp::new(start + step)).unwrap().amount;
        }

        let (mut whole, registry) = engine_with_policy(rate, from, to);
        registry.grant(&alice);
        whole.start_accruing(&alice, &alice, Timestamp::new(start)).unwrap();
        let once = whole.mint_accrued(&alice, 1, Timestamp::new(end)).unwrap().amount;

        prop_assert_eq!(paid, once);
        prop_assert_eq!(split.ledger().balance_of(&alice), once);
    }

    /// The settlement cursor never moves backwards, whatever the claim times.
    #[test]
    fn cursor_is_monotonic(
        from in 0u64..1_000,
        len in 1u64..5_000,
        mut times in prop::collection::vec(0u64..10_000, 1..16),
        finalize_at in prop::option::of(0u64..10_000),
    ) {
        times.sort_unstable();
        let alice = Address::new("ubi_alice");
        let gov = Address::new("ubi_gov");
        let (mut engine, registry) = engine_with_policy(7, from, from + len);
        registry.grant(&alice);
        engine.start_accruing(&alice, &alice, Timestamp::new(0)).unwrap();

        let mut last = None;
        for t in times {
            if finalize_at == Some(t) {
                let _ = engine.finalize_policy(&gov, 1, Timestamp::new(t));
            }
            engine.mint_accrued(&alice, 1, Timestamp::new(t)).unwrap();
            let cursor = engine.last_settled(&alice, 1);
            prop_assert!(cursor >= last, "cursor moved back: {:?} -> {:?}", last, cursor);
            last = cursor;
        }
    }

    /// Nothing accrues before valid_from, and nothing more after valid_to.
    #[test]
    fn window_clamp(
        rate in 1u128..1_000_000,
        from in 1u64..100_000,
        len in 1u64..100_000,
        since in 0u64..200_000,
        before in 0u64..100_000,
        extra_a in 0u64..100_000,
        extra_b in 0u64..100_000,
    ) {
        let policy = Policy::new(rate, Timestamp::new(from), Timestamp::new(from + len)).unwrap();
        let since = Some(Timestamp::new(since));

        let early = accrue(Some(&policy), since, None, Timestamp::new(before % from)).unwrap();
        prop_assert_eq!(early.amount, 0);

        let to = from + len;
        let a = accrue(Some(&policy), since, None, Timestamp::new(to + extra_a)).unwrap();
        let b = accrue(Some(&policy), since, None, Timestamp::new(to + extra_b)).unwrap();
        prop_assert_eq!(a.amount, b.amount);
    }

    /// Accrual never decreases as time moves forward (nothing claimed).
    #[test]
    fn accrual_monotonic_in_time(
        rate in 1u128..1_000_000,
        from in 0u64..10_000,
        len in 1u64..100_000,
        since in 0u64..20_000,
        t1 in 0u64..200_000,
        dt in 0u64..100_000,
    ) {
        let policy = Policy::new(rate, Timestamp::new(from), Timestamp::new(from + len)).unwrap();
        let since = Some(Timestamp::new(since));
        let a = accrue(Some(&policy), since, None, Timestamp::new(t1)).unwrap();
        let b = accrue(Some(&policy), since, None, Timestamp::new(t1 + dt)).unwrap();
        prop_assert!(b.amount >= a.amount);
    }

    /// After finalization, valid_to never grows and later finalizations fail.
    #[test]
    fn finalize_only_shrinks(
        from in 0u64..10_000,
        len in 2u64..10_000,
        offset in 0u64..10_000,
        later in 0u64..10_000,
    ) {
        let gov = Address::new("ubi_gov");
        let (mut engine, _) = engine_with_policy(1, from, from + len);
        let at = from + offset % len;
        engine.finalize_policy(&gov, 1, Timestamp::new(at)).unwrap();
        prop_assert_eq!(engine.policy(1).unwrap().valid_to, Timestamp::new(at));
        prop_assert!(engine.finalize_policy(&gov, 1, Timestamp::new(at + later)).is_err());
        prop_assert_eq!(engine.policy(1).unwrap().valid_to, Timestamp::new(at));
    }

    /// A removal report pays the reporter exactly what the participant could have claimed.
    #[test]
    fn removal_pays_outstanding_accrual(
        rate in 1u128..10_000,
        len in 1u64..100_000,
        claim_at in 0u64..100_000,
        report_at in 0u64..100_000,
    ) {
        let alice = Address::new("ubi_alice");
        let bob = Address::new("ubi_bob");
        let (mut engine, registry) = engine_with_policy(rate, 0, len);
        registry.grant(&alice);
        engine.start_accruing(&alice, &alice, Timestamp::new(0)).unwrap();
        let claim_at = Timestamp::new(claim_at.min(report_at));
        let report_at = Timestamp::new(report_at);
        engine.mint_accrued(&alice, 1, claim_at).unwrap();

        let expected = engine.get_accrued_value(&alice, 1, report_at).unwrap();
        registry.revoke(&alice);
        let record = engine.report_removal(&bob, &alice, &[1, 1], report_at).unwrap();
        prop_assert_eq!(record.amount, expected);
        prop_assert_eq!(engine.ledger().balance_of(&bob), expected);
        prop_assert_eq!(engine.get_accrued_value(&alice, 1, Timestamp::new(len)).unwrap(), 0);
    }
}
