use super::*;

#[test]
fn parses_build_with_defaults() {
    let cli = Cli::try_parse_from(["erpfeed", "build", "a.json", "b.json"])
        .expect("expected valid cli args");
    let Commands::Build {
        inputs,
        output,
        format,
        shelf_date,
        workers,
    } = cli.command
    else {
        panic!("expected build command");
    };
    assert_eq!(inputs, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
    assert!(output.is_none());
    assert_eq!(format, OutputFormat::Json);
    assert!(shelf_date.is_none());
    assert!(workers.is_none());
}

#[test]
fn parses_build_with_all_options() {
    let cli = Cli::try_parse_from([
        "erpfeed",
        "build",
        "a.json",
        "--output",
        "out.tsv",
        "--format",
        "tsv",
        "--shelf-date",
        "2025/11/03",
        "--workers",
        "4",
    ])
    .expect("expected valid cli args");
    let Commands::Build {
        output,
        format,
        shelf_date,
        workers,
        ..
    } = cli.command
    else {
        panic!("expected build command");
    };
    assert_eq!(output, Some(PathBuf::from("out.tsv")));
    assert_eq!(format, OutputFormat::Tsv);
    assert_eq!(shelf_date, NaiveDate::from_ymd_opt(2025, 11, 3));
    assert_eq!(workers, Some(4));
}

#[test]
fn build_requires_at_least_one_input() {
    assert!(Cli::try_parse_from(["erpfeed", "build"]).is_err());
}

#[test]
fn build_rejects_unparseable_shelf_date() {
    assert!(Cli::try_parse_from(["erpfeed", "build", "a.json", "--shelf-date", "soon"]).is_err());
}

#[test]
fn parses_month_and_cutoff_commands() {
    let cli = Cli::try_parse_from(["erpfeed", "month", "2025年3月"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Month { ref value } if value == "2025年3月"));

    let cli = Cli::try_parse_from(["erpfeed", "cutoff", "2025/12/15"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Cutoff { ref value } if value == "2025/12/15"));
}

#[test]
fn parses_shippers_command() {
    let cli = Cli::try_parse_from(["erpfeed", "shippers"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Shippers));
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["erpfeed"]).is_err());
}
