//! Job parameters passed to the scheduler

use crate::schema::{FieldDef, LeafKind, ModelDef, Schema};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a job name
pub const MAX_JOB_NAME_LEN: usize = 100;

/// Resources and naming for one job
///
/// Optional parameters left unset fall back to the scheduler's own defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobParameters {
    pub n_cores: u32,
    pub mem_per_core: u64,
    pub job_name: String,
    pub n_cores_per_node: Option<u32>,
    pub run_time: Option<NaiveTime>,
    pub n_gpus: Option<u32>,
    pub mem_per_gpu: Option<u64>,
}

/// Fresh unique job name
pub fn generate_job_name() -> String {
    Uuid::new_v4().simple().to_string()
}

impl Schema for JobParameters {
    fn model() -> ModelDef {
        ModelDef::new("JobParameters")
            .field(
                FieldDef::leaf("n_cores", LeafKind::positive_int())
                    .required()
                    .describe("Number of CPU cores."),
            )
            .field(
                FieldDef::leaf("mem_per_core", LeafKind::positive_long())
                    .required()
                    .describe("Minimum memory required per allocated CPU."),
            )
            // Optional for the user, but always sent to the scheduler
            .field(
                FieldDef::leaf(
                    "job_name",
                    LeafKind::Str {
                        min_len: Some(1),
                        max_len: Some(MAX_JOB_NAME_LEN),
                    },
                )
                .default_with(generate_job_name)
                .describe("Name for your job."),
            )
            .field(
                FieldDef::leaf("n_cores_per_node", LeafKind::positive_int())
                    .describe("Number of CPU cores per node."),
            )
            .field(
                FieldDef::leaf("run_time", LeafKind::Time)
                    .describe("Limit on the total run time of the job."),
            )
            .field(FieldDef::leaf("n_gpus", LeafKind::positive_int()).describe("Number of GPUs."))
            .field(
                FieldDef::leaf("mem_per_gpu", LeafKind::positive_long())
                    .describe("Minimum memory required per allocated GPU."),
            )
    }
}
