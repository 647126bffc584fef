use super::common::{account_inputs, wizard_at_preferences};
use crate::forms::gateway::MockRegistrationGateway;
use crate::forms::registration::domain::{RegistrationField, RegistrationInput};
use crate::forms::registration::wizard::{
    RegistrationWizard, WizardError, WizardState, WizardStep,
};
use crate::forms::SubmitOutcome;
use std::time::Duration;

#[test]
fn step_table_declares_the_gated_fields() {
    assert_eq!(
        WizardStep::Account.required_fields(),
        &[
            RegistrationField::Email,
            RegistrationField::Password,
            RegistrationField::ConfirmPassword,
        ],
    );
    assert_eq!(
        WizardStep::Personal.required_fields(),
        &[
            RegistrationField::FirstName,
            RegistrationField::LastName,
            RegistrationField::Address,
            RegistrationField::City,
        ],
    );
    assert!(WizardStep::Preferences.required_fields().is_empty());
}

#[test]
fn next_with_mismatched_passwords_stays_on_account() {
    let mut wizard = RegistrationWizard::new();
    wizard
        .set_field(RegistrationInput::Email("ada@example.com".to_string()))
        .unwrap();
    wizard
        .set_field(RegistrationInput::Password("difference engine".to_string()))
        .unwrap();
    wizard
        .set_field(RegistrationInput::ConfirmPassword("analytical engine".to_string()))
        .unwrap();

    let step = wizard.next().expect("wizard is editable");

    assert_eq!(step, WizardStep::Account);
    assert_eq!(wizard.active_step(), Some(WizardStep::Account));
    assert_eq!(
        wizard.form().error(RegistrationField::ConfirmPassword),
        Some("Passwords don't match"),
    );
}

#[test]
fn next_does_not_touch_later_steps_fields() {
    let mut wizard = RegistrationWizard::new();
    for input in account_inputs() {
        wizard.set_field(input).unwrap();
    }

    let step = wizard.next().expect("wizard is editable");

    assert_eq!(step, WizardStep::Personal);
    // The personal step's empty names must not be flagged yet.
    assert!(wizard.form().errors().is_empty());
}

#[test]
fn back_never_validates_and_keeps_entered_data() {
    let mut wizard = wizard_at_preferences();
    wizard
        .set_field(RegistrationInput::FirstName("X".to_string()))
        .unwrap();

    let step = wizard.back().expect("wizard is editable");

    assert_eq!(step, WizardStep::Personal);
    assert!(wizard.form().errors().is_empty());
    assert_eq!(wizard.form().record().first_name, "X");
    assert_eq!(wizard.form().record().email, "ada.lovelace@example.com");
}

#[test]
fn back_is_a_no_op_on_the_first_step() {
    let mut wizard = RegistrationWizard::new();
    let step = wizard.back().expect("wizard is editable");
    assert_eq!(step, WizardStep::Account);
}

#[tokio::test]
async fn submit_is_rejected_before_the_final_step() {
    let gateway = MockRegistrationGateway::new(Duration::ZERO);
    let mut wizard = RegistrationWizard::new();

    match wizard.submit(&gateway).await {
        Err(WizardError::NotAtFinalStep) => {}
        other => panic!("expected step rejection, got {other:?}"),
    }
    assert!(gateway.submissions().is_empty());
}

#[tokio::test]
async fn successful_submit_completes_with_the_assigned_id() {
    let gateway = MockRegistrationGateway::new(Duration::ZERO);
    let mut wizard = wizard_at_preferences();
    wizard
        .set_field(RegistrationInput::Notifications(true))
        .unwrap();

    let outcome = wizard.submit(&gateway).await.expect("submit is allowed");

    match outcome {
        SubmitOutcome::Success(receipt) => assert_eq!(receipt.id, "reg-000001"),
        other => panic!("expected success, got {other:?}"),
    }
    match wizard.state() {
        WizardState::Complete(receipt) => assert_eq!(receipt.id, "reg-000001"),
        other => panic!("expected completion, got {other:?}"),
    }
    assert_eq!(wizard.active_step(), None);

    // Submitted record carries the entered values.
    let submitted = gateway.submissions();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].email, "ada.lovelace@example.com");
    assert!(submitted[0].notifications);
}

#[tokio::test]
async fn rejected_submit_stays_on_preferences_with_data_intact() {
    let gateway = MockRegistrationGateway::new(Duration::ZERO);
    let mut wizard = RegistrationWizard::new();
    wizard
        .set_field(RegistrationInput::Email("error@example.com".to_string()))
        .unwrap();
    wizard
        .set_field(RegistrationInput::Password("difference engine".to_string()))
        .unwrap();
    wizard
        .set_field(RegistrationInput::ConfirmPassword("difference engine".to_string()))
        .unwrap();
    assert_eq!(wizard.next().unwrap(), WizardStep::Personal);
    wizard
        .set_field(RegistrationInput::FirstName("Ada".to_string()))
        .unwrap();
    wizard
        .set_field(RegistrationInput::LastName("Lovelace".to_string()))
        .unwrap();
    assert_eq!(wizard.next().unwrap(), WizardStep::Preferences);

    let outcome = wizard.submit(&gateway).await.expect("submit is allowed");

    assert!(matches!(outcome, SubmitOutcome::Failure(_)));
    assert_eq!(wizard.active_step(), Some(WizardStep::Preferences));
    assert_eq!(
        wizard.submit_error(),
        Some("Failed to submit registration. Please try again."),
    );
    assert_eq!(wizard.form().record().email, "error@example.com");
    assert_eq!(wizard.form().record().first_name, "Ada");
}

#[tokio::test]
async fn invalid_submit_surfaces_field_errors_without_calling_the_gateway() {
    let gateway = MockRegistrationGateway::new(Duration::ZERO);
    let mut wizard = wizard_at_preferences();
    wizard
        .set_field(RegistrationInput::ConfirmPassword("drifted".to_string()))
        .unwrap();

    let outcome = wizard.submit(&gateway).await.expect("submit is allowed");

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert!(gateway.submissions().is_empty());
    assert_eq!(
        wizard.form().error(RegistrationField::ConfirmPassword),
        Some("Passwords don't match"),
    );
}

#[tokio::test]
async fn completed_wizard_rejects_further_edits() {
    let gateway = MockRegistrationGateway::new(Duration::ZERO);
    let mut wizard = wizard_at_preferences();
    wizard.submit(&gateway).await.expect("submit is allowed");

    match wizard.set_field(RegistrationInput::Email("late@example.com".to_string())) {
        Err(WizardError::Completed) => {}
        other => panic!("expected completed error, got {other:?}"),
    }
    assert!(matches!(wizard.next(), Err(WizardError::Completed)));
    assert!(matches!(wizard.back(), Err(WizardError::Completed)));
}
