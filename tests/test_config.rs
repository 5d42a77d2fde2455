use std::io::Write;

use herald::config::Config;

fn write_temp_config(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("herald-config-{}-{name}.yaml", std::process::id()));
    let mut out = std::fs::File::create(&path).unwrap();
    out.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_default_config() {
    let cfg = Config::default();

    assert_eq!(cfg.listen_addr, "0.0.0.0");
    assert_eq!(cfg.listen_port, 7000);
    assert_eq!(cfg.worker_threads, 3);
}

#[test]
fn test_config_from_yaml_file() {
    let path = write_temp_config(
        "full",
        "listen_addr: \"127.0.0.1\"\nlisten_port: 8080\nworker_threads: 5\n",
    );

    let cfg = Config::from_file(&path).unwrap();
    assert_eq!(cfg.listen_addr, "127.0.0.1");
    assert_eq!(cfg.listen_port, 8080);
    assert_eq!(cfg.worker_threads, 5);

    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_partial_yaml_falls_back_to_defaults() {
    let path = write_temp_config("partial", "listen_port: 9999\n");

    let cfg = Config::from_file(&path).unwrap();
    assert_eq!(cfg.listen_port, 9999);
    assert_eq!(cfg.listen_addr, "0.0.0.0");
    assert_eq!(cfg.worker_threads, 3);

    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_missing_config_file_is_an_error() {
    let result = Config::from_file("/nonexistent/herald.yaml");
    assert!(result.is_err());
}

#[test]
fn test_malformed_yaml_is_an_error() {
    let path = write_temp_config("malformed", "listen_port: not-a-port\n");

    assert!(Config::from_file(&path).is_err());

    std::fs::remove_file(path).unwrap();
}

// Environment handling lives in one test: the variables are process-global
// and the test harness runs tests concurrently.
#[test]
fn test_env_overrides() {
    unsafe {
        std::env::set_var("HERALD_LISTEN_ADDR", "127.0.0.1");
        std::env::set_var("HERALD_LISTEN_PORT", "3000");
        std::env::set_var("HERALD_WORKER_THREADS", "2");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.listen_addr, "127.0.0.1");
    assert_eq!(cfg.listen_port, 3000);
    assert_eq!(cfg.worker_threads, 2);

    unsafe {
        std::env::set_var("HERALD_LISTEN_PORT", "not-a-port");
    }
    assert!(Config::load().is_err());

    unsafe {
        std::env::remove_var("HERALD_LISTEN_ADDR");
        std::env::remove_var("HERALD_LISTEN_PORT");
        std::env::remove_var("HERALD_WORKER_THREADS");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.listen_port, 7000);
}
