use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::UserCoordinator;
use crate::types::db::user::Role;
use crate::types::internal::context::RequestContext;

/// Create an admin account and print its generated password once
pub async fn create_admin(
    app_data: Arc<AppData>,
    username: &str,
    full_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = UserCoordinator::new(app_data);

    let created = coordinator
        .create_user(&RequestContext::new(), username, full_name, Role::Admin, None)
        .await?;

    println!("\nAdmin account created");
    println!("  username: {}", created.user.username);
    if let Some(password) = created.generated_password {
        println!("  password: {}", password);
    }
    println!("\nStore this password now. It will not be shown again.\n");

    Ok(())
}
