//! Replayable command log written before anything is executed.
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use sweep_model::{EXE_VARIABLE, RunSpec, SimJob, TEMPLATE_VARIABLE};
use thiserror::Error;
use tracing::info;

use crate::builder::quote;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write command log {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Renders every job's command line into a batch script that can be re-run by hand.
pub struct CommandExporter<'a> {
    spec: &'a RunSpec,
}

impl<'a> CommandExporter<'a> {
    pub fn new(spec: &'a RunSpec) -> Self {
        Self { spec }
    }

    /// Script text; identical jobs always render to identical bytes.
    pub fn render(&self, jobs: &[SimJob]) -> String {
        let exe = self.spec.engine_exe().display().to_string();
        let template = self.spec.template().display().to_string();
        let exe_ref = quote(&format!("%{EXE_VARIABLE}%"));
        let template_ref = quote(&format!("%{TEMPLATE_VARIABLE}%"));

        let mut out = String::new();
        out.push_str(&format!("set \"{EXE_VARIABLE}={exe}\"\n"));
        out.push_str(&format!("set \"{TEMPLATE_VARIABLE}={template}\"\n"));
        out.push('\n');
        for job in jobs {
            let line = job
                .command_line
                .replace(&quote(&exe), &exe_ref)
                .replace(&quote(&template), &template_ref);
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
        out.push_str("Pause\n");
        out
    }

    /// Write the script to the configured export path, creating parent directories.
    pub fn write(&self, jobs: &[SimJob]) -> Result<PathBuf, ExportError> {
        let path = self.spec.export_path().to_path_buf();
        write_file(&path, &self.render(jobs)).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        info!(target: "sweep.core.export", path = %path.display(), jobs = jobs.len(), "command log written");
        Ok(path)
    }
}

fn write_file(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, path::PathBuf};

    use sweep_model::RunConfig;

    use super::*;

    fn spec(export_path: Option<PathBuf>) -> RunSpec {
        RunSpec::from_config_unchecked(RunConfig {
            engine_exe: PathBuf::from("C:/engine/engine.exe"),
            template: PathBuf::from("C:/runs/model_[e1].tcf"),
            batch_flags: "-b".to_string(),
            values: BTreeMap::from([("e1".to_string(), vec!["A".to_string(), "BB".to_string()])]),
            export_path,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn render_substitutes_variables() {
        let spec = spec(None);
        let jobs = crate::prepare(&spec).unwrap();
        let text = CommandExporter::new(&spec).render(&jobs);

        let expected = concat!(
            "set \"ENGINE_EXE=C:/engine/engine.exe\"\n",
            "set \"TEMPLATE=C:/runs/model_[e1].tcf\"\n",
            "\n",
            "START /NORMAL /WAIT \"\" \"%ENGINE_EXE%\" -b -e1  A \"%TEMPLATE%\"\n",
            "START /NORMAL /WAIT \"\" \"%ENGINE_EXE%\" -b -e1 BB \"%TEMPLATE%\"\n",
            "\n",
            "Pause\n",
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn write_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("commands.bat");
        let spec = spec(Some(path.clone()));
        let jobs = crate::prepare(&spec).unwrap();
        let exporter = CommandExporter::new(&spec);

        assert_eq!(exporter.write(&jobs).unwrap(), path);
        let first = fs::read(&path).unwrap();
        exporter.write(&jobs).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn write_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        let spec = spec(Some(blocker.join("commands.bat")));
        let err = CommandExporter::new(&spec).write(&[]).unwrap_err();
        assert!(err.to_string().contains("commands.bat"));
    }
}
