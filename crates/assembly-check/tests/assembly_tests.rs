use approx::assert_relative_eq;
use assembly_check::*;
use mesh_align::{InterferenceVerdict, ToleranceBudget};
use proptest::prelude::*;
use solid_kernel::{MockKernel, SolidHandle};

/// Disjoint unit spheres for a frame and `n` stations. Nothing intersects
/// until a test scripts a volume.
fn gang(kernel: &mut MockKernel, n: usize) -> AssemblyHandles {
    let frame = kernel.add_sphere([0.0, -100.0, 0.0], 1.0);
    (0..n).fold(AssemblyHandles::new(frame), |assembly, i| {
        let x = 10.0 * i as f64;
        assembly.with_station(StationHandles {
            wheel: kernel.add_sphere([x, 0.0, 0.0], 1.0),
            peg_head: kernel.add_sphere([x, 5.0, 0.0], 1.0),
            string_post: kernel.add_sphere([x, 0.0, 5.0], 1.0),
        })
    })
}

fn script(kernel: &mut MockKernel, a: &SolidHandle, b: &SolidHandle, volume: f64) {
    kernel.set_intersection(a, b, volume);
}

// ── Aggregation ────────────────────────────────────────────────────────────

#[test]
fn five_stations_of_small_mesh_contact_pass() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 5);
    for s in &assembly.stations {
        script(&mut kernel, &s.wheel, &s.peg_head, 0.02);
    }

    let result =
        check_assembly_interference(&kernel, &assembly, &InterferencePolicy::default()).unwrap();

    assert_relative_eq!(result.total_mm3, 0.10, epsilon = 1e-12);
    assert_relative_eq!(result.threshold_mm3, 0.15, epsilon = 1e-12);
    assert!(result.passed());
    let breakdown = result.breakdown();
    assert_eq!(breakdown.len(), 5 * 4 + 1);
    assert_eq!(breakdown["tuner_3_gear_mesh"], 0.02);
    assert_eq!(breakdown["tuner_3_wheel_in_cavity"], 0.0);
    assert_relative_eq!(breakdown["total"], 0.10, epsilon = 1e-12);
}

#[test]
fn single_station_over_allowance_is_rejected() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 1);
    let s = &assembly.stations[0];
    script(&mut kernel, &s.wheel, &s.peg_head, 0.05);

    let err = check_assembly_interference(&kernel, &assembly, &InterferencePolicy::default())
        .unwrap_err();

    assert_eq!(err.breakdown()["tuner_1_gear_mesh"], 0.05);
    assert_eq!(err.total_mm3(), 0.05);
    assert_eq!(err.result.threshold_mm3, 0.03);
    let msg = err.to_string();
    assert!(msg.contains("0.0500"), "{msg}");
    assert!(msg.contains("1 stations"), "{msg}");
}

#[test]
fn total_equal_to_threshold_is_rejected() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 1);
    let s = &assembly.stations[0];
    script(&mut kernel, &s.string_post, &assembly.frame, 0.03);

    let result = check_assembly_interference(&kernel, &assembly, &InterferencePolicy::default());
    assert!(result.is_err());
}

#[test]
fn every_check_contributes_to_the_total() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 2);
    let s = assembly.stations[1].clone();
    script(&mut kernel, &s.wheel, &s.peg_head, 0.001);
    script(&mut kernel, &s.string_post, &assembly.frame, 0.002);
    script(&mut kernel, &s.peg_head, &assembly.frame, 0.004);
    script(&mut kernel, &s.wheel, &assembly.frame, 0.008);

    let result = run_interference_report(&kernel, &assembly, &InterferencePolicy::default());
    let b = result.breakdown();
    assert_eq!(b["tuner_2_gear_mesh"], 0.001);
    assert_eq!(b["tuner_2_post_in_hole"], 0.002);
    assert_eq!(b["tuner_2_worm_in_hole"], 0.004);
    assert_eq!(b["tuner_2_wheel_in_cavity"], 0.008);
    assert_relative_eq!(result.total_mm3, 0.015, epsilon = 1e-12);
    assert_eq!(result.nonzero_checks().len(), 4);
    assert!(result.nonzero_checks().iter().all(|c| c.station == 2));
}

#[test]
fn empty_assembly_passes() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 0);
    let result =
        check_assembly_interference(&kernel, &assembly, &InterferencePolicy::default()).unwrap();
    assert_eq!(result.total_mm3, 0.0);
    assert_eq!(result.threshold_mm3, 0.0);
    assert!(result.passed());
    assert_eq!(result.breakdown().len(), 1);
    assert_eq!(kernel.query_count(), 0);
}

#[test]
fn report_mode_never_rejects() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 1);
    let s = &assembly.stations[0];
    script(&mut kernel, &s.wheel, &assembly.frame, 2.0);

    let result = run_interference_report(&kernel, &assembly, &InterferencePolicy::default());
    assert!(!result.passed());
    assert_eq!(result.breakdown()["tuner_1_wheel_in_cavity"], 2.0);
    assert!(result.to_text().contains("Status: FAIL"));
}

#[test]
fn four_read_only_queries_per_station() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 3);
    let live = kernel.live_solids();
    run_interference_report(&kernel, &assembly, &InterferencePolicy::default());
    assert_eq!(kernel.query_count(), 12);
    assert_eq!(kernel.live_solids(), live);
}

#[test]
fn failed_query_reads_as_zero_and_is_flagged() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 1);
    let s = &assembly.stations[0];
    kernel.fail_intersection(&s.peg_head, &assembly.frame);

    let result = run_interference_report(&kernel, &assembly, &InterferencePolicy::default());
    assert_eq!(result.failed_queries(), 1);
    assert_eq!(result.breakdown()["tuner_1_worm_in_hole"], 0.0);
    assert!(result.passed());
    assert!(result
        .to_text()
        .contains("tuner_1_worm_in_hole: 0.0000 mm³ (query failed)"));
}

#[test]
fn custom_allowance_changes_threshold() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 2);
    let s = &assembly.stations[0];
    script(&mut kernel, &s.wheel, &s.peg_head, 0.05);
    let policy = InterferencePolicy {
        per_station_allowance_mm3: 0.1,
        ..Default::default()
    };
    let result = check_assembly_interference(&kernel, &assembly, &policy).unwrap();
    assert_relative_eq!(result.threshold_mm3, 0.2);
}

#[test]
fn policy_deserializes_with_defaults() {
    let policy: InterferencePolicy = serde_json::from_str("{}").unwrap();
    assert_eq!(policy, InterferencePolicy::default());
    assert_eq!(policy.per_station_allowance_mm3, 0.03);
}

#[test]
fn check_kinds_name_their_keys() {
    let names: Vec<&str> = CheckKind::ALL.iter().map(|k| k.name()).collect();
    assert_eq!(
        names,
        ["gear_mesh", "post_in_hole", "worm_in_hole", "wheel_in_cavity"]
    );
    assert_eq!(CheckKind::WormInHole.key(4), "tuner_4_worm_in_hole");
    assert_eq!(
        serde_json::to_string(&CheckKind::WheelInCavity).unwrap(),
        "\"wheel_in_cavity\""
    );
}

#[test]
fn report_text_lists_every_check() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 1);
    let s = &assembly.stations[0];
    script(&mut kernel, &s.wheel, &s.peg_head, 0.0125);

    let text = run_interference_report(&kernel, &assembly, &InterferencePolicy::default())
        .to_string();
    assert!(text.starts_with("=== Assembly Interference Report ==="));
    assert!(text.contains("Tuner 1: 0.0125 mm³\n"));
    assert!(text.contains("  tuner_1_gear_mesh: 0.0125 mm³ [WITHIN_MANUFACTURING]\n"));
    assert!(text.contains("  tuner_1_wheel_in_cavity: 0.0000 mm³\n"));
    assert!(text.contains("Total: 0.0125 mm³ (threshold 0.0300 mm³)"));
    assert!(text.contains("Status: PASS"));
}

#[test]
fn stations_exactly_at_allowance_are_rejected() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 10);
    for s in &assembly.stations {
        script(&mut kernel, &s.wheel, &s.peg_head, 0.02);
    }
    let policy = InterferencePolicy {
        per_station_allowance_mm3: 0.02,
        ..Default::default()
    };

    let err = check_assembly_interference(&kernel, &assembly, &policy).unwrap_err();
    assert_eq!(err.total_mm3(), err.result.threshold_mm3);
    assert!(!err.result.passed());
}

#[test]
fn total_is_sum_of_station_subtotals() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 3);
    let (s1, s3) = (assembly.stations[0].clone(), assembly.stations[2].clone());
    script(&mut kernel, &s1.wheel, &s1.peg_head, 0.004);
    script(&mut kernel, &s1.wheel, &assembly.frame, 0.001);
    script(&mut kernel, &s3.string_post, &assembly.frame, 0.002);

    let result = run_interference_report(&kernel, &assembly, &InterferencePolicy::default());
    let subtotals = result.station_subtotals();
    assert_eq!(subtotals.len(), 3);
    assert_relative_eq!(subtotals[0], 0.005, epsilon = 1e-15);
    assert_eq!(subtotals[1], 0.0);
    assert_eq!(subtotals[2], 0.002);
    assert_relative_eq!(result.total_mm3, subtotals.iter().sum::<f64>(), epsilon = 1e-15);
    assert!(result.to_text().contains("Tuner 2: 0.0000 mm³\n"));
}

#[test]
fn gear_mesh_is_classified_per_station() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 3);
    let s = assembly.stations.clone();
    script(&mut kernel, &s[0].wheel, &s[0].peg_head, 0.05);
    script(&mut kernel, &s[1].wheel, &s[1].peg_head, 0.5);
    script(&mut kernel, &s[2].wheel, &assembly.frame, 0.05);
    let policy = InterferencePolicy {
        mesh_budget: ToleranceBudget::new(0.1, 1.0),
        ..Default::default()
    };

    let result = run_interference_report(&kernel, &assembly, &policy);
    assert_eq!(
        result.mesh_verdicts(),
        [
            Some(InterferenceVerdict::WithinBacklash),
            Some(InterferenceVerdict::WithinManufacturing),
            Some(InterferenceVerdict::None),
        ]
    );
    assert!(result
        .checks
        .iter()
        .filter(|c| c.kind != CheckKind::GearMesh)
        .all(|c| c.verdict.is_none()));

    let text = result.to_text();
    assert!(text.contains("tuner_1_gear_mesh: 0.0500 mm³ [WITHIN_BACKLASH]"), "{text}");
    assert!(text.contains("tuner_3_gear_mesh: 0.0000 mm³ [NONE]"), "{text}");
}

#[test]
fn mesh_over_budget_is_flagged_even_when_assembly_passes() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 4);
    let s = &assembly.stations[0];
    script(&mut kernel, &s.wheel, &s.peg_head, 0.02);
    let policy = InterferencePolicy {
        mesh_budget: ToleranceBudget::new(0.005, 0.01),
        ..Default::default()
    };

    let result = check_assembly_interference(&kernel, &assembly, &policy).unwrap();
    assert_eq!(result.mesh_verdicts()[0], Some(InterferenceVerdict::Exceeds));
}

// ── Pairwise audit ─────────────────────────────────────────────────────────

#[test]
fn named_parts_number_stations_from_one() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 2);
    let names: Vec<String> = assembly.named_parts().into_iter().map(|p| p.name).collect();
    assert_eq!(
        names,
        [
            "frame",
            "wheel_1",
            "peg_head_1",
            "string_post_1",
            "wheel_2",
            "peg_head_2",
            "string_post_2"
        ]
    );
}

#[test]
fn clean_assembly_has_no_findings() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 1);
    let audit = audit_pairwise(&kernel, &assembly.named_parts(), &PairwiseLimits::default());

    assert!(audit.passed());
    assert_eq!(audit.pairs_checked, 5);
    assert_eq!(audit.pairs_skipped, 1);
    assert_eq!(audit.failed_queries, 0);
    assert!(audit.to_string().contains("Component intersections: none"));
}

#[test]
fn skipped_pairs_are_never_queried() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 1);
    let s = &assembly.stations[0];
    script(&mut kernel, &s.string_post, &s.wheel, 5.0);

    let audit = audit_pairwise(&kernel, &assembly.named_parts(), &PairwiseLimits::default());
    assert!(audit.passed());
    assert_eq!(kernel.query_count(), 5);
}

#[test]
fn gear_mesh_pair_gets_the_looser_limit() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 1);
    let s = &assembly.stations[0];
    script(&mut kernel, &s.wheel, &s.peg_head, 0.05);
    script(&mut kernel, &s.wheel, &assembly.frame, 0.02);

    let audit = audit_pairwise(&kernel, &assembly.named_parts(), &PairwiseLimits::default());

    assert_eq!(audit.findings.len(), 1);
    let f = &audit.findings[0];
    assert_eq!((f.first.as_str(), f.second.as_str()), ("frame", "wheel_1"));
    assert_eq!(f.limit_mm3, 0.01);
    assert!(!f.gear_mesh);
    assert!(audit.to_string().contains("frame ∩ wheel_1 = 0.020 mm³"));
}

#[test]
fn gear_mesh_over_its_limit_is_reported() {
    let mut kernel = MockKernel::new();
    let assembly = gang(&mut kernel, 1);
    let s = &assembly.stations[0];
    script(&mut kernel, &s.wheel, &s.peg_head, 0.15);

    let audit = audit_pairwise(&kernel, &assembly.named_parts(), &PairwiseLimits::default());
    assert_eq!(audit.findings.len(), 1);
    assert!(audit.findings[0].gear_mesh);
    assert!(audit
        .to_string()
        .contains("wheel_1 ∩ peg_head_1 = 0.150 mm³ (gear mesh limit 0.1)"));
}

#[test]
fn washer_and_screw_overlaps_are_skipped() {
    let mut kernel = MockKernel::new();
    let peg = kernel.add_sphere([0.0, 0.0, 0.0], 1.0);
    let washer = kernel.add_sphere([0.0, 0.0, 0.5], 1.0);
    let screw = kernel.add_sphere([0.0, 0.0, 1.0], 1.0);
    let parts = [
        NamedPart::new("peg_head_1", peg),
        NamedPart::new("peg_washer_1", washer),
        NamedPart::new("peg_screw_1", screw),
    ];
    let audit = audit_pairwise(&kernel, &parts, &PairwiseLimits::default());
    assert_eq!(audit.pairs_skipped, 3);
    assert_eq!(audit.pairs_checked, 0);
    assert!(audit.passed());
}

#[test]
fn unanswerable_pair_is_counted() {
    let mut kernel = MockKernel::new();
    let a = kernel.add_sphere([0.0, 0.0, 0.0], 1.0);
    let b = kernel.add_block([5.0, 5.0, 5.0], [6.0, 6.0, 6.0]);
    let parts = [NamedPart::new("frame", a), NamedPart::new("bracket", b)];
    let audit = audit_pairwise(&kernel, &parts, &PairwiseLimits::default());
    assert_eq!(audit.failed_queries, 1);
    assert!(audit.passed());
}

// ── Properties ─────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn identical_stations_sum_linearly(k in 1usize..12, v in 0.0f64..0.05) {
        let mut kernel = MockKernel::new();
        let assembly = gang(&mut kernel, k);
        for s in &assembly.stations {
            kernel.set_intersection(&s.wheel, &s.peg_head, v);
        }
        let result = run_interference_report(&kernel, &assembly, &InterferencePolicy::default());
        prop_assert!((result.total_mm3 - k as f64 * v).abs() <= 1e-12);
        prop_assert_eq!(result.station_subtotals(), vec![v; k]);
        prop_assert!((result.threshold_mm3 - 0.03 * k as f64).abs() <= 1e-12);
        prop_assert_eq!(result.checks.len(), 4 * k);
        prop_assert_eq!(result.passed(), result.total_mm3 < result.threshold_mm3);
    }
}
