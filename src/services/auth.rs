// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::{user_repo::NewUser, UserRepository},
    models::auth::{AuthResponse, Claims, DocumentType, RegisterUserPayload, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    jwt_expiration_hours: i64,
    bcrypt_cost: u32,
    pool: SqlitePool,
}

/// Mantém só os dígitos e confere o tamanho esperado para o tipo.
pub fn normalize_document(raw: &str, tipo: DocumentType) -> Result<String, AppError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != tipo.expected_digits() {
        return Err(AppError::InvalidDocument);
    }
    Ok(digits)
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        jwt_secret: String,
        jwt_expiration_hours: i64,
        bcrypt_cost: u32,
        pool: SqlitePool,
    ) -> Self {
        Self { user_repo, jwt_secret, jwt_expiration_hours, bcrypt_cost, pool }
    }

    // Cria a conta como pendente. Não aprova nem promove ninguém.
    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<User, AppError> {
        let documento = normalize_document(&payload.documento, payload.tipo_documento)?;

        // Hashing fora do runtime assíncrono
        let password_clone = payload.password.clone();
        let cost = self.bcrypt_cost;
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let user = self
            .user_repo
            .create_user(
                &self.pool,
                NewUser {
                    username: payload.username.trim(),
                    password_hash: &hashed_password,
                    nome_completo: payload.nome_completo.trim(),
                    documento: &documento,
                    tipo_documento: payload.tipo_documento,
                },
            )
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "Conta registrada (pendente)");
        Ok(user)
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        // Usuário inexistente e senha errada produzem o mesmo erro
        let user = self
            .user_repo
            .find_by_username(username.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Portão de aprovação: só revelado depois da senha conferir
        if user.is_blocked {
            return Err(AppError::AccountBlocked(user.block_reason.clone()));
        }
        if !user.is_approved {
            return Err(AppError::AccountPendingApproval);
        }

        let token = self.create_token(&user)?;
        tracing::info!(user_id = %user.id, "Login realizado");

        Ok(AuthResponse {
            token,
            user_id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        })
    }

    pub fn decode_claims(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;
        Ok(token_data.claims)
    }

    /// Decodifica o token e recarrega a conta. Contas apagadas invalidam o token;
    /// contas bloqueadas depois da emissão são barradas.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = self.decode_claims(token)?;

        let user = self
            .user_repo
            .find_by_id(&self.pool, claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if user.is_blocked {
            return Err(AppError::AccountBlocked(user.block_reason.clone()));
        }
        Ok(user)
    }

    fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.jwt_expiration_hours);

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_is_normalized_to_digits() {
        assert_eq!(
            normalize_document("123.456.789-09", DocumentType::Cpf).unwrap(),
            "12345678909"
        );
        assert_eq!(
            normalize_document("12.345.678/0001-99", DocumentType::Cnpj).unwrap(),
            "12345678000199"
        );
    }

    #[test]
    fn document_length_must_match_type() {
        assert!(matches!(
            normalize_document("12345678909", DocumentType::Cnpj),
            Err(AppError::InvalidDocument)
        ));
        assert!(matches!(
            normalize_document("abc", DocumentType::Cpf),
            Err(AppError::InvalidDocument)
        ));
    }
}
