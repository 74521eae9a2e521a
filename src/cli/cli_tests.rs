//! CLI tests: argument parsing, config mapping, output formatting.

use super::*;
use grpcnav::{CandidateOrder, ClassDecl, MethodDecl, SearchScope, SourceLocation, SuffixPolicy};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args.iter().copied()).unwrap()
}

#[test]
fn test_goto_args_with_defaults() {
    let cli = parse(&["grpcnav", "goto", "--file", "App.java", "--line", "12", "--col", "30"]);
    assert_eq!(cli.log_level, "warn");
    let Commands::Goto(args) = cli.command else { panic!("expected goto") };
    assert_eq!(args.file, "App.java");
    assert_eq!((args.line, args.col), (12, 30));
    assert_eq!(args.opts.dir, ".");
    assert_eq!(args.opts.ext, "java,kt");
    assert_eq!(args.opts.suffix_policy, SuffixPolicy::RequireStub);
    assert_eq!(args.opts.order, CandidateOrder::Lexicographic);
    assert!(args.opts.scope.is_empty());
    assert!(!args.opts.json);
    assert!(!args.opts.no_ignore);
}

#[test]
fn test_resolve_args_with_policy_and_scopes() {
    let cli = parse(&[
        "grpcnav", "resolve", "-r", "orderClient", "-m", "place",
        "--suffix-policy", "strip-if-present", "--order", "index",
        "--scope", "server", "--scope", "billing", "--json", "--log-level", "debug",
    ]);
    assert_eq!(cli.log_level, "debug");
    let Commands::Resolve(args) = cli.command else { panic!("expected resolve") };
    assert_eq!(args.receiver, "orderClient");
    assert_eq!(args.method, "place");
    assert_eq!(args.opts.suffix_policy, SuffixPolicy::StripIfPresent);
    assert_eq!(args.opts.order, CandidateOrder::Index);
    assert_eq!(args.opts.scope, vec!["server", "billing"]);
    assert!(args.opts.json);
}

#[test]
fn test_invalid_suffix_policy_is_rejected() {
    let result = Cli::try_parse_from(["grpcnav", "resolve", "-r", "a", "-m", "b", "--suffix-policy", "maybe"]);
    assert!(result.is_err());
}

#[test]
fn test_candidates_method_is_optional() {
    let cli = parse(&["grpcnav", "candidates", "--receiver", "userStub"]);
    let Commands::Candidates(args) = cli.command else { panic!("expected candidates") };
    assert_eq!(args.method, None);
}

#[test]
fn test_index_stats_args() {
    let cli = parse(&["grpcnav", "index-stats", "--dir", "/src", "--no-ignore"]);
    let Commands::IndexStats(args) = cli.command else { panic!("expected index-stats") };
    assert_eq!(args.dir, "/src");
    assert!(args.no_ignore);
}

#[test]
fn test_resolver_config_from_opts() {
    let cli = parse(&["grpcnav", "resolve", "-r", "a", "-m", "b", "--scope", "/no/such/dir"]);
    let Commands::Resolve(args) = cli.command else { panic!("expected resolve") };
    let config = args.opts.resolver_config();
    assert_eq!(config.suffix_policy, SuffixPolicy::RequireStub);
    assert_eq!(config.order, CandidateOrder::Lexicographic);
    // non-existent prefixes are kept verbatim
    assert_eq!(config.scope, SearchScope::Paths(vec!["/no/such/dir".to_string()]));
}

#[test]
fn test_resolver_config_without_scope_is_all() {
    let cli = parse(&["grpcnav", "resolve", "-r", "a", "-m", "b"]);
    let Commands::Resolve(args) = cli.command else { panic!("expected resolve") };
    assert_eq!(args.opts.resolver_config().scope, SearchScope::All);
}

#[test]
fn test_normalize_log_level() {
    assert_eq!(normalize_log_level("DEBUG"), "debug");
    assert_eq!(normalize_log_level("trace"), "trace");
    assert_eq!(normalize_log_level("verbose"), "warn");
}

fn sample_match(declaring_class: &str) -> Match {
    Match {
        class: ClassDecl {
            name: "OrderGrpcService".to_string(),
            qualified_name: "shop.OrderGrpcService".to_string(),
            location: Some(SourceLocation { file: "src/OrderGrpcService.java".to_string(), line: 5, column: 14 }),
        },
        method: MethodDecl {
            name: "place".to_string(),
            declaring_class: declaring_class.to_string(),
            signature: None,
            location: Some(SourceLocation { file: "src/OrderGrpcService.java".to_string(), line: 9, column: 17 }),
        },
        tier: Tier::GrpcService,
    }
}

#[test]
fn test_format_match_declared() {
    let line = format_match(&sample_match("shop.OrderGrpcService"));
    assert_eq!(line, "src/OrderGrpcService.java:9:17  shop.OrderGrpcService.place  [GrpcService]");
}

#[test]
fn test_format_match_inherited() {
    let line = format_match(&sample_match("shop.OrderServiceGrpc.OrderServiceImplBase"));
    assert!(line.ends_with("(inherited from shop.OrderServiceGrpc.OrderServiceImplBase)"));
}

#[test]
fn test_format_match_without_method_location_uses_class() {
    let mut m = sample_match("shop.OrderGrpcService");
    m.method.location = None;
    assert!(format_match(&m).starts_with("src/OrderGrpcService.java:5:14"));
}

#[test]
fn test_goto_rejects_zero_cursor() {
    let cli = parse(&["grpcnav", "goto", "--file", "App.java", "--line", "0", "--col", "3"]);
    let Commands::Goto(args) = cli.command else { panic!("expected goto") };
    assert!(matches!(cmd_goto(args), Err(NavError::InvalidArgs(_))));
}

#[test]
fn test_format_kind_counts() {
    let mut index = DefinitionIndex::default();
    assert_eq!(format_kind_counts(&index), "none");

    let entry = |name: &str, kind| definitions::DefinitionEntry {
        file_id: 0,
        name: name.to_string(),
        kind,
        line: 1,
        column: 1,
        package: None,
        parent: None,
        qualified_name: name.to_string(),
        signature: None,
        base_types: Vec::new(),
    };
    index.add_file_definitions(0, vec![
        entry("run", definitions::DefinitionKind::Method),
        entry("Api", definitions::DefinitionKind::Interface),
        entry("App", definitions::DefinitionKind::Class),
        entry("stop", definitions::DefinitionKind::Method),
    ]);
    assert_eq!(format_kind_counts(&index), "1 class, 1 interface, 2 method");
}
