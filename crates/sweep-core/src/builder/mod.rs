//! Turns parameter combinations into launchable jobs.
use std::collections::HashMap;

use sweep_model::{ConfigError, ParameterCombination, RunSpec, SimJob, validate_resource_flags};
use tracing::debug;

/// Builds the argument vector and the replayable command line of every job.
pub struct CommandBuilder<'a> {
    spec: &'a RunSpec,
    exe: String,
    template: String,
}

impl<'a> CommandBuilder<'a> {
    /// Fails if resource flags are configured both as batch flags and as slots.
    pub fn new(spec: &'a RunSpec) -> Result<Self, ConfigError> {
        validate_resource_flags(spec.batch_flags(), spec.slots())?;
        Ok(Self {
            spec,
            exe: spec.engine_exe().display().to_string(),
            template: spec.template().display().to_string(),
        })
    }

    /// Build one job per combination, numbered from 1 in the given order.
    ///
    /// Values are padded to the widest value seen for their key across all `combos`.
    pub fn build(&self, combos: &[ParameterCombination]) -> Vec<SimJob> {
        let widths = widths(combos);
        let jobs: Vec<SimJob> = combos
            .iter()
            .enumerate()
            .map(|(i, combo)| {
                let (argv, resource_at) = self.argv(combo, &widths);
                let line = self.command_line(combo, &widths);
                SimJob::new(i + 1, combo.clone(), argv, resource_at, line)
            })
            .collect();

        debug!(target: "sweep.core.builder", jobs = jobs.len(), "jobs built");
        jobs
    }

    /// `[exe, batch flags.., -key value.., template]` and the slot insertion point.
    fn argv(
        &self,
        combo: &ParameterCombination,
        widths: &HashMap<&str, usize>,
    ) -> (Vec<String>, usize) {
        let mut argv = Vec::with_capacity(2 + self.spec.batch_flags().len() + combo.len() * 2);
        argv.push(self.exe.clone());
        argv.extend(self.spec.batch_flags().iter().cloned());
        let resource_at = argv.len();

        for (key, value) in combo.iter() {
            argv.push(format!("-{key}"));
            argv.push(pad(value, widths.get(key).copied().unwrap_or(0)));
        }
        argv.push(self.template.clone());
        (argv, resource_at)
    }

    /// `START /<PRIORITY> /WAIT "" "<exe>" <batch flags> -key value .. "<template>"`.
    ///
    /// Never carries slot flags; the line is meant to be replayed by hand.
    fn command_line(&self, combo: &ParameterCombination, widths: &HashMap<&str, usize>) -> String {
        let mut parts: Vec<String> = vec![
            "START".to_string(),
            format!("/{}", self.spec.priority().start_switch()),
            "/WAIT".to_string(),
            "\"\"".to_string(),
            quote(&self.exe),
        ];
        parts.extend(self.spec.batch_flags().iter().cloned());
        for (key, value) in combo.iter() {
            parts.push(format!("-{key}"));
            parts.push(pad(value, widths.get(key).copied().unwrap_or(0)));
        }
        parts.push(quote(&self.template));
        parts.join(" ")
    }
}

/// Widest value per key over the whole combination set.
fn widths(combos: &[ParameterCombination]) -> HashMap<&str, usize> {
    let mut out: HashMap<&str, usize> = HashMap::new();
    for (key, value) in combos.iter().flat_map(|c| c.iter()) {
        let w = out.entry(key).or_default();
        *w = (*w).max(value.chars().count());
    }
    out
}

fn pad(value: &str, width: usize) -> String {
    format!("{value:>width$}")
}

pub(crate) fn quote(s: &str) -> String {
    format!("\"{s}\"")
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, path::PathBuf};

    use sweep_model::{JobStatus, RunConfig, Slot};

    use super::*;
    use crate::ParameterSpace;

    fn spec(batch_flags: &str, slots: Vec<Slot>, values: &[(&str, &[&str])]) -> RunSpec {
        RunSpec::from_config_unchecked(RunConfig {
            engine_exe: PathBuf::from("C:/engine/engine.exe"),
            template: PathBuf::from("C:/runs/model_[e1]_[s1].tcf"),
            batch_flags: batch_flags.to_string(),
            priority: "low".to_string(),
            slots,
            values: values
                .iter()
                .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
                .collect::<BTreeMap<_, _>>(),
            ..Default::default()
        })
        .unwrap()
    }

    fn build(spec: &RunSpec) -> Vec<SimJob> {
        let builder = CommandBuilder::new(spec).unwrap();
        builder.build(&ParameterSpace::from_spec(spec).combinations())
    }

    #[test]
    fn argv_ends_with_template_and_carries_flags() {
        let spec = spec("-b", vec![], &[("e1", &["A", "B"]), ("s1", &["X"])]);
        let jobs = build(&spec);

        assert_eq!(jobs.len(), 2);
        assert_eq!(
            jobs[0].argv,
            vec!["C:/engine/engine.exe", "-b", "-e1", "A", "-s1", "X", "C:/runs/model_[e1]_[s1].tcf"]
        );
        assert_eq!(jobs[1].argv[2..6], ["-e1", "B", "-s1", "X"]);
        assert_eq!(jobs[0].resource_at, 2);
    }

    #[test]
    fn jobs_are_numbered_from_one_and_queued() {
        let spec = spec("", vec![], &[("e1", &["A", "B", "C"]), ("s1", &["X"])]);
        let jobs = build(&spec);

        let indexes: Vec<_> = jobs.iter().map(|j| j.index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
        assert!(jobs.iter().all(|j| j.status == JobStatus::Queued && j.slot.is_none()));
    }

    #[test]
    fn values_are_padded_to_widest_value_of_key() {
        let spec = spec("", vec![], &[("e1", &["5", "100"]), ("s1", &["X"])]);
        let jobs = build(&spec);

        assert_eq!(jobs[0].argv[2], "  5");
        assert_eq!(jobs[1].argv[2], "100");
        assert_eq!(jobs[0].argv[4], "X");
    }

    #[test]
    fn command_line_uses_start_convention_without_slot_flags() {
        let spec = spec("-b -x", vec![Slot::Single("-pu0".into())], &[("e1", &["A"]), ("s1", &["X"])]);
        let jobs = build(&spec);

        assert_eq!(
            jobs[0].command_line,
            r#"START /LOW /WAIT "" "C:/engine/engine.exe" -b -x -e1 A -s1 X "C:/runs/model_[e1]_[s1].tcf""#
        );
        assert!(!jobs[0].argv.iter().any(|a| a == "-pu0"));
    }

    #[test]
    fn no_active_keys_builds_single_job() {
        let spec = spec("-b", vec![], &[]);
        let jobs = build(&spec);

        assert_eq!(jobs.len(), 1);
        assert_eq!(
            jobs[0].argv,
            vec!["C:/engine/engine.exe", "-b", "C:/runs/model_[e1]_[s1].tcf"]
        );
    }

    #[test]
    fn conflicting_resource_flags_fail_before_build() {
        let spec = spec("-b", vec![Slot::Single("-pu0".into())], &[("e1", &["A"])]);
        assert!(CommandBuilder::new(&spec).is_ok());

        // A spec carrying the conflict cannot be built at all.
        let err = RunSpec::from_config_unchecked(RunConfig {
            engine_exe: PathBuf::from("engine"),
            template: PathBuf::from("model_[e1].tcf"),
            batch_flags: "-pu0".into(),
            slots: vec![Slot::Single("-pu0".into())],
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingResourceFlags(_)));
    }
}
