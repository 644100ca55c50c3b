//! CLI argument parsing and end-to-end rewrite tests.
//!
//! The CLI is a binary crate, so subcommand parsing is tested against a
//! mirrored clap struct (the binary's own `Cli`/`Commands` aren't
//! reachable from `tests/`), and end-to-end behavior is tested by driving
//! `cirw-engine`/`cirw-ir` directly against fixture files, the same way
//! `commands::run::execute` does internally.

mod clap_parsing {
    use clap::{Args, Parser, Subcommand};

    #[derive(Parser)]
    #[command(name = "cirw")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,
        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Run(TestRunArgs),
        Batch(TestBatchArgs),
        ConvertRules(TestConvertArgs),
    }

    #[derive(Args)]
    struct TestSharedOptions {
        #[arg(long)]
        no_optimize: bool,
        #[arg(long)]
        strategy: Option<String>,
        #[arg(long, default_value = "cycle")]
        metric: String,
        #[arg(long, default_value = "IBM")]
        system: String,
        #[arg(long, default_value = "all")]
        depth_size: String,
        #[arg(long)]
        stat: Option<String>,
        #[arg(long)]
        log: Option<String>,
        #[arg(long, default_value = "./log/")]
        logs: String,
        #[arg(long)]
        seed: Option<u64>,
    }

    #[derive(Args)]
    struct TestRunArgs {
        input: String,
        #[arg(short, long)]
        output: Option<String>,
        #[command(flatten)]
        shared: TestSharedOptions,
    }

    #[derive(Args)]
    struct TestBatchArgs {
        input_dir: String,
        output_dir: String,
        #[command(flatten)]
        shared: TestSharedOptions,
    }

    #[derive(Args)]
    struct TestConvertArgs {
        #[arg(long)]
        family: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(short, long)]
        output: String,
    }

    #[test]
    fn run_minimal_defaults() {
        let cli = TestCli::try_parse_from(["cirw", "run", "bell.qasm"]).unwrap();
        match cli.command {
            TestCommands::Run(args) => {
                assert_eq!(args.input, "bell.qasm");
                assert!(args.output.is_none());
                assert!(!args.shared.no_optimize);
                assert_eq!(args.shared.metric, "cycle");
                assert_eq!(args.shared.system, "IBM");
            }
            _ => panic!("expected Run"),
        }
    }

    #[test]
    fn run_with_migration_and_strategy() {
        let cli = TestCli::try_parse_from([
            "cirw", "run", "bell.qasm", "-o", "out.qasm", "--system", "IBM:Surface", "--strategy", "MCM", "--metric", "depth",
            "--seed", "7",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Run(args) => {
                assert_eq!(args.output.unwrap(), "out.qasm");
                assert_eq!(args.shared.system, "IBM:Surface");
                assert_eq!(args.shared.strategy.unwrap(), "MCM");
                assert_eq!(args.shared.metric, "depth");
                assert_eq!(args.shared.seed, Some(7));
            }
            _ => panic!("expected Run"),
        }
    }

    #[test]
    fn run_missing_input_errors() {
        assert!(TestCli::try_parse_from(["cirw", "run"]).is_err());
    }

    #[test]
    fn batch_positional_dirs() {
        let cli = TestCli::try_parse_from(["cirw", "batch", "in/", "out/"]).unwrap();
        match cli.command {
            TestCommands::Batch(args) => {
                assert_eq!(args.input_dir, "in/");
                assert_eq!(args.output_dir, "out/");
            }
            _ => panic!("expected Batch"),
        }
    }

    #[test]
    fn convert_rules_requires_all_flags() {
        assert!(TestCli::try_parse_from(["cirw", "convert-rules", "--family", "reversible"]).is_err());
        let cli = TestCli::try_parse_from([
            "cirw",
            "convert-rules",
            "--family",
            "reversible",
            "--from",
            "IBM",
            "--to",
            "Surface",
            "-o",
            "out.json",
        ])
        .unwrap();
        match cli.command {
            TestCommands::ConvertRules(args) => {
                assert_eq!(args.family, "reversible");
                assert_eq!(args.from, "IBM");
                assert_eq!(args.to, "Surface");
            }
            _ => panic!("expected ConvertRules"),
        }
    }

    #[test]
    fn verbose_flag_counts() {
        let cli = TestCli::try_parse_from(["cirw", "-vv", "run", "bell.qasm"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn unknown_subcommand_errors() {
        assert!(TestCli::try_parse_from(["cirw", "frobnicate"]).is_err());
    }
}

mod end_to_end {
    use cirw_engine::{RunOptions, SystemPair};
    use cirw_ir::Circuit;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const HEADER: &str = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\n";

    #[test]
    fn run_on_fixture_file_reduces_adjacent_cx_pair() {
        let source = format!("{HEADER}cx q[0],q[1];\ncx q[0],q[1];\nh q[2];\n");
        let mut circuit = Circuit::from_source("fixture.qasm", &source, "IBM").unwrap();

        let options = RunOptions::default();
        let mut rng = StdRng::seed_from_u64(42);
        let shrank = cirw_engine::execute(&mut circuit, &options, &mut rng).unwrap();

        assert!(shrank);
        assert_eq!(circuit.len(), 1);
        assert_eq!(circuit.draft(), "h");
    }

    #[test]
    fn run_without_optimize_leaves_draft_unchanged() {
        let source = format!("{HEADER}cx q[0],q[1];\ncx q[0],q[1];\n");
        let mut circuit = Circuit::from_source("fixture.qasm", &source, "IBM").unwrap();

        let options = RunOptions { optimize: false, ..RunOptions::default() };
        let mut rng = StdRng::seed_from_u64(1);
        let shrank = cirw_engine::execute(&mut circuit, &options, &mut rng).unwrap();

        assert!(!shrank);
        assert_eq!(circuit.len(), 2);
    }

    #[test]
    fn migration_swap_fallback_round_trips_render() {
        let source = format!("{HEADER}z q[0];\n");
        let mut circuit = Circuit::from_source("fixture.qasm", &source, "IBM").unwrap();

        let options = RunOptions {
            system: SystemPair::Pair { source: cirw_engine::System::Ibm, target: cirw_engine::System::Surface },
            ..RunOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        cirw_engine::execute(&mut circuit, &options, &mut rng).unwrap();

        assert_eq!(circuit.system(), "Surface");
        assert!(circuit.render().starts_with(HEADER));
    }
}
