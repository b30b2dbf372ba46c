//! Local draft persistence for projects and jobs staged before payment.
//!
//! Records live in redis under prefix keys; project membership is an
//! ordered list so the console can show jobs in creation order.

use std::sync::Arc;

use log::debug;
use redis::Commands;

use crate::error::DeeployError;
use crate::models::job::Job;
use crate::models::project::Project;

const PROJECT_KEY_PREFIX: &str = "deeploy:project:";
const PROJECT_SET_KEY: &str = "deeploy:projects";
const JOB_KEY_PREFIX: &str = "deeploy:job:";
const PROJECT_JOBS_KEY_PREFIX: &str = "deeploy:project-jobs:";
const JOB_ID_KEY: &str = "deeploy:job-id";

pub struct RedisStore {
    pub client: redis::Client,
}

impl RedisStore {
    pub fn new(url: &str) -> Result<Self, DeeployError> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }
}

pub struct DraftStore {
    redis: Arc<RedisStore>,
}

impl DraftStore {
    pub fn new(redis: Arc<RedisStore>) -> Self {
        Self { redis }
    }

    pub fn save_project(&self, project: &Project) -> Result<(), DeeployError> {
        let mut con = self.redis.client.get_connection()?;
        let project_key = format!("{}{}", PROJECT_KEY_PREFIX, project.project_hash);
        let _: () = con.set(&project_key, project.clone())?;
        // Saves are idempotent per hash, so membership is a set
        let _: () = con.sadd(PROJECT_SET_KEY, &project.project_hash)?;
        debug!("Saved draft project {}", project.project_hash);
        Ok(())
    }

    pub fn get_project(&self, project_hash: &str) -> Result<Option<Project>, DeeployError> {
        let mut con = self.redis.client.get_connection()?;
        let project_key = format!("{}{}", PROJECT_KEY_PREFIX, project_hash);
        let project: Option<Project> = con.get(&project_key)?;
        Ok(project)
    }

    pub fn list_projects(&self) -> Result<Vec<Project>, DeeployError> {
        let mut con = self.redis.client.get_connection()?;
        let hashes: Vec<String> = con.smembers(PROJECT_SET_KEY)?;

        let mut projects = Vec::with_capacity(hashes.len());
        for hash in hashes {
            let project_key = format!("{}{}", PROJECT_KEY_PREFIX, hash);
            if let Some(project) = con.get::<_, Option<Project>>(&project_key)? {
                projects.push(project);
            }
        }
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(projects)
    }

    /// Removes the project, its job list, and every job in it.
    pub fn delete_project(&self, project_hash: &str) -> Result<(), DeeployError> {
        let jobs = self.jobs_for_project(project_hash)?;
        let mut con = self.redis.client.get_connection()?;

        for job in jobs {
            let job_key = format!("{}{}", JOB_KEY_PREFIX, job.id);
            let _: () = con.del(&job_key)?;
        }

        let jobs_key = format!("{}{}", PROJECT_JOBS_KEY_PREFIX, project_hash);
        let _: () = con.del(&jobs_key)?;
        let project_key = format!("{}{}", PROJECT_KEY_PREFIX, project_hash);
        let _: () = con.del(&project_key)?;
        let _: () = con.srem(PROJECT_SET_KEY, project_hash)?;
        Ok(())
    }

    /// Persists a job, assigning the next id when the draft has none yet.
    pub fn save_job(&self, job: &Job) -> Result<Job, DeeployError> {
        let mut con = self.redis.client.get_connection()?;

        let mut job = job.clone();
        let is_new = job.id == 0;
        if is_new {
            job.id = con.incr(JOB_ID_KEY, 1u64)?;
        }

        let job_key = format!("{}{}", JOB_KEY_PREFIX, job.id);
        let _: () = con.set(&job_key, job.clone())?;
        if is_new {
            let jobs_key = format!("{}{}", PROJECT_JOBS_KEY_PREFIX, job.project_hash);
            let _: () = con.rpush(&jobs_key, job.id)?;
        }
        debug!("Saved draft job {} in project {}", job.id, job.project_hash);
        Ok(job)
    }

    pub fn get_job(&self, id: u64) -> Result<Option<Job>, DeeployError> {
        let mut con = self.redis.client.get_connection()?;
        let job_key = format!("{}{}", JOB_KEY_PREFIX, id);
        let job: Option<Job> = con.get(&job_key)?;
        Ok(job)
    }

    pub fn jobs_for_project(&self, project_hash: &str) -> Result<Vec<Job>, DeeployError> {
        let mut con = self.redis.client.get_connection()?;
        let jobs_key = format!("{}{}", PROJECT_JOBS_KEY_PREFIX, project_hash);
        let ids: Vec<u64> = con.lrange(&jobs_key, 0, -1)?;

        let mut jobs = Vec::with_capacity(ids.len());
        for id in ids {
            let job_key = format!("{}{}", JOB_KEY_PREFIX, id);
            if let Some(job) = con.get::<_, Option<Job>>(&job_key)? {
                jobs.push(job);
            }
        }
        Ok(jobs)
    }

    pub fn delete_job(&self, id: u64) -> Result<(), DeeployError> {
        let Some(job) = self.get_job(id)? else {
            return Ok(());
        };
        let mut con = self.redis.client.get_connection()?;

        let job_key = format!("{}{}", JOB_KEY_PREFIX, id);
        let _: () = con.del(&job_key)?;
        let jobs_key = format!("{}{}", PROJECT_JOBS_KEY_PREFIX, job.project_hash);
        let _: () = con.lrem(&jobs_key, 0, id)?;
        Ok(())
    }

    /// Flips a draft to paid once the escrow payment confirmed. Returns the
    /// updated job, or `None` when no such draft exists.
    pub fn mark_paid(&self, id: u64) -> Result<Option<Job>, DeeployError> {
        let Some(mut job) = self.get_job(id)? else {
            return Ok(None);
        };
        job.paid = true;

        let mut con = self.redis.client.get_connection()?;
        let job_key = format!("{}{}", JOB_KEY_PREFIX, id);
        let _: () = con.set(&job_key, job.clone())?;
        Ok(Some(job))
    }
}
