use shared::{CreateUserRequest, UpdateUserRequest, User as SharedUser};

use crate::domain::commands::users::{CreateUserCommand, UpdateUserCommand};
use crate::domain::models::user::User as DomainUser;

pub struct UserMapper;

impl UserMapper {
    pub fn to_dto(domain: DomainUser) -> SharedUser {
        SharedUser {
            id: domain.id.to_string(),
            username: domain.username,
            email: domain.email,
            is_active: domain.is_active,
        }
    }

    pub fn to_create_command(dto: CreateUserRequest) -> CreateUserCommand {
        CreateUserCommand {
            name: dto.name,
            email: dto.email,
        }
    }

    pub fn to_update_command(user_id: String, dto: UpdateUserRequest) -> UpdateUserCommand {
        UpdateUserCommand {
            user_id,
            name: dto.name,
            email: dto.email,
        }
    }
}
