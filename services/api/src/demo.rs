use std::sync::Arc;

use clap::Args;

use hirelink::error::AppError;
use hirelink::marketplace::alerts::{JobAlertService, NotificationDispatcher, NotificationStore};
use hirelink::marketplace::applications::{
    ApplicationEventHandler, ApplicationLifecycle, ChatProvisioner, ChatProvisioningHandler,
    RequestedStatus, StatusNotificationHandler, SubmissionRequest,
};
use hirelink::marketplace::directory::{JobDirectory, JobId, UserId};

use crate::infra::{
    seeded_directory, InMemoryApplicationStore, InMemoryChatChannelStore, InMemoryNotificationStore,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the job-alert fan-out portion of the demo.
    #[arg(long)]
    pub(crate) skip_alerts: bool,
}

/// Walks the seeded marketplace through the full lifecycle: submission,
/// shortlist with chat provisioning and notification, then a publish
/// fan-out against the seeded seeker preferences.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let applications = Arc::new(InMemoryApplicationStore::default());
    let channels = Arc::new(InMemoryChatChannelStore::default());
    let notifications = Arc::new(InMemoryNotificationStore::default());
    let directory = Arc::new(seeded_directory());

    let provisioner = Arc::new(ChatProvisioner::new(
        applications.clone(),
        channels.clone(),
        directory.clone(),
    ));
    let dispatcher = Arc::new(NotificationDispatcher::new(notifications.clone()));
    let handlers: Vec<Arc<dyn ApplicationEventHandler>> = vec![
        Arc::new(ChatProvisioningHandler::new(provisioner.clone())),
        Arc::new(StatusNotificationHandler::new(dispatcher.clone())),
    ];
    let lifecycle = Arc::new(ApplicationLifecycle::new(
        applications,
        directory.clone(),
        handlers,
    ));

    println!("HireLink marketplace demo");

    let job_id = JobId("job-001".to_string());
    let applicant = UserId("seeker-001".to_string());
    let job = match directory.job(&job_id) {
        Ok(Some(job)) => job,
        Ok(None) => {
            println!("  Seeded job missing, aborting demo");
            return Ok(());
        }
        Err(err) => {
            println!("  Job directory unavailable: {err}");
            return Ok(());
        }
    };
    println!(
        "\nApplication lifecycle ({} at {})",
        job.title,
        job.location.as_deref().unwrap_or("unspecified")
    );

    let record = match lifecycle.submit(SubmissionRequest {
        job_id: job_id.clone(),
        applicant_id: applicant.clone(),
        cover_letter: Some("I led the design system rollout at my last role.".to_string()),
        resume_ref: None,
    }) {
        Ok(record) => record,
        Err(err) => {
            println!("  Submission rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- {} submitted application {} -> status {}",
        record.applicant_id.0,
        record.id.0,
        record.status.label()
    );

    let shortlisted = match lifecycle.transition(
        &record.id,
        RequestedStatus::Shortlisted,
        &job.employer_id,
    ) {
        Ok(updated) => updated,
        Err(err) => {
            println!("  Transition failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- {} shortlisted the application -> status {}",
        job.employer_id.0,
        shortlisted.status.label()
    );

    match provisioner.ensure_channel(&record.id) {
        Ok(channel) => println!(
            "- Chat channel {} open between {} and {}",
            channel.id.0, channel.employer_id.0, channel.applicant_id.0
        ),
        Err(err) => println!("  Chat channel unavailable: {err}"),
    }

    match notifications.list_for_recipient(&applicant, false) {
        Ok(records) => {
            println!("- Applicant inbox:");
            for notification in records {
                println!("    [{}] {}", notification.category.label(), notification.body);
            }
        }
        Err(err) => println!("  Notification store unavailable: {err}"),
    }

    if args.skip_alerts {
        return Ok(());
    }

    println!("\nJob alert fan-out");
    let alerts = Arc::new(JobAlertService::new(directory.clone(), dispatcher));
    let published = match directory.job(&JobId("job-002".to_string())) {
        Ok(Some(job)) => job,
        Ok(None) => {
            println!("  Seeded job missing, skipping fan-out");
            return Ok(());
        }
        Err(err) => {
            println!("  Job directory unavailable: {err}");
            return Ok(());
        }
    };

    let report = alerts.announce(&published);
    println!(
        "- Published '{}': {} seekers matched, {} notified",
        published.title, report.matched, report.dispatched
    );
    if let Some(reason) = report.degraded {
        println!("  Fan-out degraded: {reason}");
    }

    for seeker in ["seeker-001", "seeker-002", "seeker-003"] {
        let recipient = UserId(seeker.to_string());
        match notifications.unread_count(&recipient) {
            Ok(count) => println!("    {seeker}: {count} unread"),
            Err(err) => println!("    {seeker}: store unavailable ({err})"),
        }
    }

    Ok(())
}
