use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use sweep_model::RunConfig;

use crate::cli::Args;

/// Read and deserialize a TOML run file. Relative paths inside it are resolved against the file's
/// directory.
pub fn load_config(path: &Path) -> anyhow::Result<RunConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read run file {}", path.display()))?;
    let mut cfg: RunConfig =
        toml::from_str(&text).with_context(|| format!("invalid run file {}", path.display()))?;

    if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        rebase(&mut cfg, base);
    }
    Ok(cfg)
}

/// Command-line switches win over file values.
pub fn apply_overrides(cfg: &mut RunConfig, args: &Args) {
    if args.execute {
        cfg.execute = true;
    }
    if args.dry_run {
        cfg.execute = false;
    }
    if let Some(path) = &args.export {
        cfg.export_path = Some(path.clone());
    }
    if let Some(level) = &args.log_level {
        cfg.log.level = level.clone();
    }
    if let Some(format) = &args.log_format {
        cfg.log.format = format.clone();
    }
    if args.no_pause {
        cfg.pause_on_finish = false;
    }
}

fn rebase(cfg: &mut RunConfig, base: &Path) {
    let resolve = |p: &Path| -> PathBuf {
        if p.as_os_str().is_empty() || p.is_absolute() {
            p.to_path_buf()
        } else {
            base.join(p)
        }
    };

    cfg.engine_exe = resolve(&cfg.engine_exe);
    cfg.template = resolve(&cfg.template);
    cfg.post_run_hook = cfg.post_run_hook.as_deref().map(resolve);
    cfg.export_path = cfg.export_path.as_deref().map(resolve);
    cfg.summary_path = cfg.summary_path.as_deref().map(resolve);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use sweep_model::Slot;

    const RUN_FILE: &str = r#"
engine_exe = "/opt/engine/engine"
template = "models/run_[e1][s1].tcf"
batch_flags = "-b -nmb"
priority = "BelowNormal"
slots = ["-pu0", ["-pu1", "-pu2"]]
key_order = ["s1"]
execute = true
launch_delay_secs = 2.5
summary_path = "out/summary.json"

[values]
e1 = ["01", "02"]
s1 = ["A"]

[log]
level = "debug"
"#;

    fn write_run_file(body: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_full_run_file() {
        let (dir, path) = write_run_file(RUN_FILE);
        let cfg = load_config(&path).unwrap();

        assert_eq!(cfg.engine_exe, PathBuf::from("/opt/engine/engine"));
        assert_eq!(cfg.template, dir.path().join("models/run_[e1][s1].tcf"));
        assert_eq!(cfg.batch_flags, "-b -nmb");
        assert_eq!(cfg.priority, "BelowNormal");
        assert_eq!(
            cfg.slots,
            vec![
                Slot::Single("-pu0".into()),
                Slot::Group(vec!["-pu1".into(), "-pu2".into()])
            ]
        );
        assert_eq!(cfg.values["e1"], vec!["01", "02"]);
        assert_eq!(cfg.key_order, Some(vec!["s1".to_string()]));
        assert!(cfg.execute);
        assert_eq!(cfg.launch_delay_secs, 2.5);
        assert_eq!(cfg.summary_path, Some(dir.path().join("out/summary.json")));
        assert_eq!(cfg.log.level, "debug");
        assert_eq!(cfg.log.format, "text");
        assert!(!cfg.pause_on_finish);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let (_dir, path) = write_run_file("engine_exe = \"x\"\nthreads = 4\n");
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("invalid run file"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("cannot read run file"));
    }

    #[test]
    fn cli_overrides_file_values() {
        let (_dir, path) = write_run_file(RUN_FILE);
        let mut cfg = load_config(&path).unwrap();
        let args = Args::try_parse_from([
            "sweep",
            "run.toml",
            "--dry-run",
            "--export",
            "/tmp/cmds.bat",
            "--log-level",
            "warn",
            "--no-pause",
        ])
        .unwrap();

        cfg.pause_on_finish = true;
        apply_overrides(&mut cfg, &args);

        assert!(!cfg.execute);
        assert!(!cfg.pause_on_finish);
        assert_eq!(cfg.export_path, Some(PathBuf::from("/tmp/cmds.bat")));
        assert_eq!(cfg.log.level, "warn");
    }
}
