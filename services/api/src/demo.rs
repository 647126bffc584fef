use crate::infra::InMemorySessionStore;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

use forms_portal::error::AppError;
use forms_portal::forms::gateway::{MockJobApplicationGateway, MockRegistrationGateway};
use forms_portal::forms::job_application::{
    ExperiencePatch, JobApplicationInput, JobApplicationService, Position, SKILL_CATALOG,
};
use forms_portal::forms::registration::{
    RegistrationInput, RegistrationService, RegistrationWizard, WizardStep,
};
use forms_portal::forms::session::SessionId;

type DemoRegistrationService =
    RegistrationService<InMemorySessionStore<RegistrationWizard>, MockRegistrationGateway>;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Simulated gateway round-trip in milliseconds
    #[arg(long, default_value_t = 250)]
    pub(crate) latency_ms: u64,
    /// Use an email the mock backend rejects, to show the retry path
    #[arg(long)]
    pub(crate) fail_registration: bool,
    /// Skip the job application portion of the demo
    #[arg(long)]
    pub(crate) skip_job_application: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let latency = Duration::from_millis(args.latency_ms);

    run_registration_demo(latency, args.fail_registration).await;

    if !args.skip_job_application {
        println!();
        run_job_application_demo(latency).await;
    }

    Ok(())
}

async fn run_registration_demo(latency: Duration, fail: bool) {
    println!("== Registration wizard ==");
    let steps: Vec<&str> = WizardStep::SEQUENCE.iter().map(|step| step.label()).collect();
    println!("steps: {}", steps.join(" -> "));

    let service = RegistrationService::new(
        Arc::new(InMemorySessionStore::default()),
        Arc::new(MockRegistrationGateway::new(latency)),
    );
    let session = service.create().expect("session opens").session_id;

    let email = if fail {
        "demo.error@example.com"
    } else {
        "demo.user@example.com"
    };

    // A deliberate typo in the confirmation shows the step gate at work.
    apply(&service, &session, RegistrationInput::Email(email.to_string()));
    apply(
        &service,
        &session,
        RegistrationInput::Password("correct horse battery".to_string()),
    );
    apply(
        &service,
        &session,
        RegistrationInput::ConfirmPassword("correct horse batery".to_string()),
    );

    let view = service.next(&session).expect("navigation runs");
    println!("next from '{}' blocked:", view.step_label.unwrap_or("?"));
    for (path, message) in &view.errors {
        println!("  {path}: {message}");
    }

    apply(
        &service,
        &session,
        RegistrationInput::ConfirmPassword("correct horse battery".to_string()),
    );
    let view = service.next(&session).expect("navigation runs");
    println!("advanced to '{}'", view.step_label.unwrap_or("?"));

    apply(&service, &session, RegistrationInput::FirstName("Demo".to_string()));
    apply(&service, &session, RegistrationInput::LastName("User".to_string()));
    apply(
        &service,
        &session,
        RegistrationInput::City(Some("Des Moines".to_string())),
    );
    let view = service.next(&session).expect("navigation runs");
    println!("advanced to '{}'", view.step_label.unwrap_or("?"));

    apply(&service, &session, RegistrationInput::Newsletter(false));

    let (_, view) = service.submit(&session).await.expect("submission runs");
    match view.registration_id {
        Some(id) => println!("registration complete, reference {id}"),
        None => println!(
            "registration failed: {}",
            view.submit_error.as_deref().unwrap_or("unknown error"),
        ),
    }
}

async fn run_job_application_demo(latency: Duration) {
    println!("== Job application ==");
    let positions: Vec<&str> = Position::ALL.iter().map(|position| position.label()).collect();
    println!("open positions: {}", positions.join(", "));
    println!("skill catalog: {}", SKILL_CATALOG.join(", "));

    let service = JobApplicationService::new(
        Arc::new(InMemorySessionStore::default()),
        Arc::new(MockJobApplicationGateway::new(latency)),
    );
    let created = service.create().expect("session opens");
    let session = created.session_id;
    let first_entry = created.record.experience[0].key;

    for input in [
        JobApplicationInput::FullName("Demo Candidate".to_string()),
        JobApplicationInput::Position(Position::Backend),
        JobApplicationInput::Skills(vec!["Python".to_string(), "AWS".to_string()]),
        JobApplicationInput::Remote(false),
        JobApplicationInput::PreferredLocation(Some("Des Moines".to_string())),
        JobApplicationInput::Experience {
            key: first_entry,
            patch: ExperiencePatch::Company("Prairie Systems".to_string()),
        },
        JobApplicationInput::Experience {
            key: first_entry,
            patch: ExperiencePatch::Role("Backend Engineer".to_string()),
        },
        JobApplicationInput::Experience {
            key: first_entry,
            patch: ExperiencePatch::StartDate("2021-06-01".to_string()),
        },
        JobApplicationInput::Experience {
            key: first_entry,
            patch: ExperiencePatch::Current(true),
        },
    ] {
        service.set_field(&session, input).expect("edit applies");
    }

    // A second, older role shows the experience list in action.
    let view = service.append_experience(&session).expect("append applies");
    let second_entry = view.record.experience[1].key;
    for patch in [
        ExperiencePatch::Company("Cornfield Labs".to_string()),
        ExperiencePatch::Role("Intern".to_string()),
        ExperiencePatch::StartDate("2020-05-01".to_string()),
        ExperiencePatch::EndDate(Some("2021-05-31".to_string())),
    ] {
        service
            .set_field(
                &session,
                JobApplicationInput::Experience {
                    key: second_entry,
                    patch,
                },
            )
            .expect("edit applies");
    }

    let (_, view) = service.submit(&session).await.expect("submission runs");
    match view.reference {
        Some(reference) => println!("application accepted, reference {reference}"),
        None => println!(
            "application failed: {}",
            view.submit_error.as_deref().unwrap_or("unknown error"),
        ),
    }
}

fn apply(service: &DemoRegistrationService, session: &SessionId, input: RegistrationInput) {
    service.set_field(session, input).expect("edit applies");
}
