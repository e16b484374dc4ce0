//! Queue-job normalizers.
//!
//! Processing opens a [`JobScope`]; processed and exception close it. The scope
//! effects are emitted regardless of flags so the bracket stays balanced.
//!
//! The end events close the scope on their name alone: an end whose payload has
//! an unexpected shape still pops exactly one level.

use super::{unexpected, Effect, Handler, Outcome};
use crate::breadcrumbs::{Breadcrumb, Category};
use crate::config::RecorderFlags;
use crate::core::JobScope;
use crate::events::Payload;
use crate::transport::FlushReason;

pub(super) fn job_processing(flags: &RecorderFlags, payload: &Payload) -> Outcome {
    let Payload::JobProcessing(ev) = payload else {
        return Err(unexpected(Handler::JobProcessing, "job_processing", payload));
    };
    let job = ev.job.as_ref();
    let name = job.name();
    let queue = job.queue();

    let mut effects = vec![Effect::EnterScope(JobScope {
        job: name.clone(),
        queue: queue.clone(),
        connection: ev.connection_name.clone(),
    })];

    if flags.record_queue_info {
        let crumb = Breadcrumb::new(Category::QueueJob)
            .with_message("Processing queue job")
            .with_data("job", name)
            .with_data("queue", queue)
            .with_data("attempts", job.attempts())
            .with_data("connection", ev.connection_name.as_str())
            .with_optional("resolved", job.resolve_name());
        effects.push(Effect::Record(crumb));
    }
    Ok(effects)
}

pub(super) fn job_processed(_flags: &RecorderFlags, _payload: &Payload) -> Outcome {
    Ok(vec![Effect::ExitScope])
}

pub(super) fn job_exception_occurred(_flags: &RecorderFlags, _payload: &Payload) -> Outcome {
    Ok(vec![Effect::ExitScope])
}

/// Flushes whatever the worker's jobs buffered.
pub(super) fn worker_stopping(_flags: &RecorderFlags, payload: &Payload) -> Outcome {
    match payload {
        Payload::WorkerStopping(_) => Ok(vec![Effect::Flush(FlushReason::WorkerStopping)]),
        other => Err(unexpected(Handler::WorkerStopping, "worker_stopping", other)),
    }
}
