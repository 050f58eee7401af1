//! Account provisioning, listing and removal rules.

use crate::in_memory::helpers::{MemoryProvisioning, create_assigned_task, workspace};
use eyre::{bail, ensure};
use gantt::identity::{
    domain::{EMPLOYEES_GROUP, IdentityDomainError, MANAGERS_GROUP, Role, UserId},
    ports::UserRepository,
    services::{CreateUserRequest, ProvisioningConfig, ProvisioningError, ProvisioningService},
};
use gantt::task::domain::TaskStatus;
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn provisioning_attaches_the_matching_role_group() -> eyre::Result<()> {
    let ws = workspace().await?;

    assert_eq!(ws.manager.role(), Role::Manager);
    ensure!(
        ws.manager.in_group(MANAGERS_GROUP),
        "managers must join the managers group at provisioning"
    );
    assert_eq!(ws.manager.groups().len(), 1);
    ensure!(
        !ws.manager.is_staff(),
        "provisioned accounts are not staff by default"
    );

    assert_eq!(ws.assignee.role(), Role::Employee);
    ensure!(
        ws.assignee.in_group(EMPLOYEES_GROUP),
        "employees must join the employees group at provisioning"
    );
    assert_eq!(ws.assignee.groups().len(), 1);

    let stored = ws
        .users
        .find_by_id(ws.assignee.id())
        .await?
        .ok_or_else(|| eyre::eyre!("provisioned account must be retrievable"))?;
    assert_eq!(stored, ws.assignee);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn usernames_are_unique_across_accounts() -> eyre::Result<()> {
    let ws = workspace().await?;

    let result = ws
        .provisioning
        .create_user(CreateUserRequest::new(
            "edward",
            "edward.second@example.com",
            Role::Employee,
        ))
        .await;

    let Err(ProvisioningError::UsernameTaken(name)) = result else {
        bail!("expected the duplicate username to be refused, got {result:?}");
    };
    assert_eq!(name, "edward");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn short_usernames_are_refused() -> eyre::Result<()> {
    let ws = workspace().await?;

    let result = ws
        .provisioning
        .create_user(CreateUserRequest::new("ed", "ed@example.com", Role::Employee))
        .await;

    let Err(ProvisioningError::Domain(IdentityDomainError::InvalidUsernameLength {
        actual, ..
    })) = result
    else {
        bail!("expected a username length refusal, got {result:?}");
    };
    assert_eq!(actual, 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stray_username_characters_are_refused() -> eyre::Result<()> {
    let ws = workspace().await?;

    let result = ws
        .provisioning
        .create_user(CreateUserRequest::new(
            "ed ward",
            "edward.two@example.com",
            Role::Employee,
        ))
        .await;

    ensure!(
        matches!(
            &result,
            Err(ProvisioningError::Domain(
                IdentityDomainError::InvalidUsernameCharacters(_)
            ))
        ),
        "expected the spaced username to be refused, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn emails_need_a_domain() -> eyre::Result<()> {
    let ws = workspace().await?;

    let result = ws
        .provisioning
        .create_user(CreateUserRequest::new(
            "vera",
            "vera.example.com",
            Role::Employee,
        ))
        .await;

    ensure!(
        matches!(
            &result,
            Err(ProvisioningError::Domain(IdentityDomainError::InvalidEmail(
                _
            )))
        ),
        "expected the separator-free email to be refused, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn email_domains_can_be_allowlisted() -> eyre::Result<()> {
    let ws = workspace().await?;
    let restricted: MemoryProvisioning = ProvisioningService::new(
        Arc::clone(&ws.users),
        Arc::clone(&ws.tasks),
        Arc::clone(&ws.clock),
        ProvisioningConfig::with_allowed_email_domains(["example.com".to_owned()]),
    );

    let result = restricted
        .create_user(CreateUserRequest::new(
            "vera",
            "vera@mail.example.org",
            Role::Employee,
        ))
        .await;
    let Err(ProvisioningError::EmailDomainNotAllowed { domain }) = result else {
        bail!("expected the outside domain to be refused, got {result:?}");
    };
    assert_eq!(domain, "mail.example.org");

    // Domain matching is case-insensitive.
    let accepted = restricted
        .create_user(CreateUserRequest::new(
            "walter",
            "walter@EXAMPLE.COM",
            Role::Employee,
        ))
        .await?;
    assert_eq!(accepted.username().as_str(), "walter");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn account_listing_is_a_manager_view() -> eyre::Result<()> {
    let ws = workspace().await?;

    let result = ws.provisioning.list_users(ws.assignee.id()).await;
    let Err(ProvisioningError::ListRequiresManager) = result else {
        bail!("expected the listing to stay with managers, got {result:?}");
    };

    let accounts = ws.provisioning.list_users(ws.manager.id()).await?;
    let names: Vec<_> = accounts
        .iter()
        .map(|account| account.username().as_str())
        .collect();
    assert_eq!(names, ["edward", "margaret", "olive"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn active_assignments_block_account_removal() -> eyre::Result<()> {
    let ws = workspace().await?;
    let task = create_assigned_task(&ws, "Migrate the intranet wiki").await?;

    let refused = ws
        .provisioning
        .delete_user(ws.manager.id(), ws.assignee.id())
        .await;
    let Err(ProvisioningError::ActiveTasksRemain { count }) = refused else {
        bail!("expected active work to block removal, got {refused:?}");
    };
    assert_eq!(count, 1);

    ws.lifecycle
        .update_status(ws.assignee.id(), task.id(), TaskStatus::InProgress)
        .await?;
    ws.lifecycle
        .update_status(ws.assignee.id(), task.id(), TaskStatus::Completed)
        .await?;

    ws.provisioning
        .delete_user(ws.manager.id(), ws.assignee.id())
        .await?;
    ensure!(
        ws.users.find_by_id(ws.assignee.id()).await?.is_none(),
        "removed accounts must not be retrievable"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_assignments_do_not_block_removal() -> eyre::Result<()> {
    let ws = workspace().await?;
    let task = create_assigned_task(&ws, "Evaluate the ticket triage bot").await?;
    ws.lifecycle
        .update_status(ws.assignee.id(), task.id(), TaskStatus::Cancelled)
        .await?;

    ws.provisioning
        .delete_user(ws.manager.id(), ws.assignee.id())
        .await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn employees_remove_only_their_own_account() -> eyre::Result<()> {
    let ws = workspace().await?;

    let refused = ws
        .provisioning
        .delete_user(ws.outsider.id(), ws.assignee.id())
        .await;
    let Err(ProvisioningError::DeleteDenied) = refused else {
        bail!("expected peer removal to be refused, got {refused:?}");
    };

    ws.provisioning
        .delete_user(ws.outsider.id(), ws.outsider.id())
        .await?;
    let remaining = ws.provisioning.list_users(ws.manager.id()).await?;
    let names: Vec<_> = remaining
        .iter()
        .map(|account| account.username().as_str())
        .collect();
    assert_eq!(names, ["edward", "margaret"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_unknown_accounts_names_the_missing_user() -> eyre::Result<()> {
    let ws = workspace().await?;

    let ghost = UserId::new();
    let missing = ws.provisioning.delete_user(ws.manager.id(), ghost).await;
    let Err(ProvisioningError::UserNotFound(reported)) = missing else {
        bail!("expected the unknown target to be reported, got {missing:?}");
    };
    assert_eq!(reported, ghost);

    let stranger = UserId::new();
    let refused = ws
        .provisioning
        .delete_user(stranger, ws.assignee.id())
        .await;
    let Err(ProvisioningError::UnknownActor(reported_actor)) = refused else {
        bail!("expected the unknown actor to be reported, got {refused:?}");
    };
    assert_eq!(reported_actor, stranger);
    Ok(())
}
