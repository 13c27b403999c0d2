use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        Self { dir }
    }

    fn store(&self) -> &Path {
        self.dir.path()
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_scorecard"))
            .arg("--store")
            .arg(self.store().join("card"))
            .args(args)
            .output()
            .expect("Failed to execute scorecard binary")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "scorecard {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    fn calibrate(&self) -> String {
        let mut taps: Vec<String> = vec!["100,100".into(), "1020,100".into(), "100,400".into()];
        for i in 1..23 {
            taps.push(format!("{},110", 100 + i * 40));
        }
        let mut args = vec!["calibrate"];
        for t in &taps {
            args.push("--tap");
            args.push(t);
        }
        self.run_ok(&args)
    }
}

#[test]
fn test_set_and_export_totals() {
    let ctx = TestContext::new();
    for (hole, v) in (1..=9).zip(["4", "5", "3", "4", "4", "5", "3", "4", "4"]) {
        ctx.run_ok(&["set", &format!("p1_h{}", hole), v]);
    }

    let csv = ctx.run_ok(&["export"]);
    let p1 = csv.lines().nth(1).unwrap();
    let fields: Vec<&str> = p1.split(',').collect();
    assert_eq!(fields[0], "P1");
    assert_eq!(fields[10], "36"); // OUT
    assert_eq!(fields[20], ""); // IN
    assert_eq!(fields[21], "36"); // TOT
}

#[test]
fn test_aggregate_cells_are_read_only() {
    let ctx = TestContext::new();
    let out = ctx.run_ok(&["set", "p2_tot", "99"]);
    assert!(out.contains("cannot be edited"));

    let csv = ctx.run_ok(&["export"]);
    assert!(!csv.contains("99"));
}

#[test]
fn test_inc_dec_clear() {
    let ctx = TestContext::new();
    assert!(ctx.run_ok(&["inc", "p1_h1"]).contains("p1_h1 = 1"));
    assert!(ctx.run_ok(&["dec", "p1_h1"]).contains("p1_h1 = 0"));
    assert!(ctx.run_ok(&["dec", "p1_h1"]).contains("p1_h1 = 0"));
    assert!(ctx.run_ok(&["clear", "p1_h1"]).contains("p1_h1 = (empty)"));
}

#[test]
fn test_bad_cell_key_fails() {
    let ctx = TestContext::new();
    let output = ctx.run(&["set", "p9_h1", "4"]);
    assert!(!output.status.success());

    let output = ctx.run(&["set", "banana", "4"]);
    assert!(!output.status.success());
}

#[test]
fn test_calibrate_then_tap() {
    let ctx = TestContext::new();
    let out = ctx.calibrate();
    assert!(out.contains("Calibration saved"));
    assert!(out.contains("138 cells"));

    // Player 2 row is 150..200, hole 2 column is 140..180.
    let out = ctx.run_ok(&["tap", "165,160", "--value", "7"]);
    assert!(out.contains("P2 • 2 = 7"), "got: {}", out);

    let out = ctx.run_ok(&["tap", "165,160", "--op", "inc", "--advance", "-1"]);
    assert!(out.contains("P2 • 1"), "got: {}", out);

    let csv = ctx.run_ok(&["export"]);
    let p2: Vec<&str> = csv.lines().nth(2).unwrap().split(',').collect();
    assert_eq!(p2[2], "8");
}

#[test]
fn test_incomplete_calibration_saves_nothing() {
    let ctx = TestContext::new();
    let out = ctx.run_ok(&["calibrate", "--tap", "100,100", "--tap", "1020,100"]);
    assert!(out.contains("Calibration incomplete: 2/25"));
    assert!(out.contains("Next: Tap bottom-left of Player 6 row"));

    let out = ctx.run_ok(&["cells"]);
    assert!(out.contains("Not calibrated"));

    let output = ctx.run(&["tap", "10,10"]);
    assert!(!output.status.success());
}

#[test]
fn test_non_finite_tap_is_rejected() {
    let ctx = TestContext::new();
    let output = ctx.run(&["calibrate", "--tap", "NaN,100"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("is not an x,y point"));
    assert!(ctx.run_ok(&["cells"]).contains("Not calibrated"));
}

#[test]
fn test_render_plan_json() {
    let ctx = TestContext::new();
    let plan = ctx.run_ok(&["render"]);
    assert!(plan.contains("\"kind\": \"uncalibrated\""));

    ctx.calibrate();
    ctx.run_ok(&["set", "p1_h1", "4"]);
    let plan = ctx.run_ok(&["render"]);
    assert!(plan.contains("\"kind\": \"card\""));
    assert!(plan.contains("\"text\": \"4\""));
    assert!(plan.contains("\"size\": \"small\""));
}

#[test]
fn test_reset_scores_keeps_calibration() {
    let ctx = TestContext::new();
    ctx.calibrate();
    ctx.run_ok(&["set", "p1_h1", "4"]);
    ctx.run_ok(&["reset", "--scores"]);

    let csv = ctx.run_ok(&["export"]);
    let p1 = csv.lines().nth(1).unwrap();
    assert_eq!(p1.trim_start_matches("P1").trim_matches(','), "");
    assert!(ctx.run_ok(&["cells"]).contains("138 cells"));

    ctx.run_ok(&["reset", "--calibration"]);
    assert!(ctx.run_ok(&["cells"]).contains("Not calibrated"));
}

#[test]
fn test_config_file_and_cli_override() {
    let ctx = TestContext::new();
    let config_path = ctx.store().join("card.json");
    std::fs::write(&config_path, r#"{"players": 2}"#).unwrap();
    let config = config_path.to_str().unwrap();

    let csv = ctx.run_ok(&["export", "--config", config]);
    assert_eq!(csv.lines().count(), 3);

    let csv = ctx.run_ok(&["export", "--config", config, "--players", "3"]);
    assert_eq!(csv.lines().count(), 4);
}

#[test]
fn test_export_to_file() {
    let ctx = TestContext::new();
    ctx.run_ok(&["set", "p1_h18", "6"]);
    let path = ctx.store().join("out.csv");
    let out = ctx.run_ok(&["export", "--output", path.to_str().unwrap()]);
    assert!(out.contains("Card saved"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("player,1,2"));
    assert!(content.contains("P1,"));
}
