use clap::Parser;
use neurochat::args::Args;
use std::path::PathBuf;

#[test]
fn defaults_match_the_bundled_layout() {
    let args = Args::parse_from(["test"]);
    assert_eq!(args.socket_addr().unwrap().to_string(), "127.0.0.1:5000");
    assert_eq!(args.memory_file, PathBuf::from("Main/memory.json"));
    assert_eq!(args.prompt_file, PathBuf::from("Configs/prompt.json"));
    assert_eq!(args.config_file, PathBuf::from("Configs/config.json"));
    assert_eq!(args.model, "gemini-2.5-flash");
    assert!(!args.open_browser);
}

#[test]
fn flags_override_defaults() {
    let args = Args::parse_from([
        "test",
        "--port",
        "8080",
        "--model",
        "gemini-pro",
        "--memory-file",
        "/tmp/m.json",
        "--open-browser",
    ]);
    assert_eq!(args.port, 8080);
    assert_eq!(args.model, "gemini-pro");
    assert_eq!(args.state_paths().memory_file, PathBuf::from("/tmp/m.json"));
    assert!(args.open_browser);
}

#[test]
fn bad_host_is_an_error() {
    let args = Args::parse_from(["test", "--host", "not a host"]);
    assert!(args.socket_addr().is_err());
}
