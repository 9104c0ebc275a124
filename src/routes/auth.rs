use actix_web::{web, HttpResponse, Responder};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::mongo::BILLING_DB;
use crate::middleware::auth::Claims;
use crate::models::operator::Operator;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    auth_token: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninInput {
    pub email: String,
    pub password: String,
}

pub async fn signin(data: web::Data<Arc<Client>>, input: web::Json<SigninInput>) -> impl Responder {
    let client = data.into_inner();
    let collection: mongodb::Collection<Operator> =
        client.database(BILLING_DB).collection("Operators");

    let input = input.into_inner();
    let filter = doc! { "email": &input.email };

    match collection.find_one(filter).await {
        Ok(Some(operator)) => {
            if bcrypt::verify(&input.password, &operator.password).unwrap_or(false) {
                let operator_id = match operator.id {
                    Some(id) => id,
                    None => {
                        return HttpResponse::InternalServerError()
                            .body("Operator record is missing an id");
                    }
                };

                let update = doc! {
                    "$set": {
                        "last_signin": Utc::now().to_rfc3339(),
                        "failed_signins": 0
                    }
                };
                if let Err(err) = collection
                    .update_one(doc! { "email": &input.email }, update)
                    .await
                {
                    eprintln!("Failed to record signin: {:?}", err);
                    return HttpResponse::InternalServerError().body("Failed to sign in.");
                }

                match generate_token(&input.email, operator_id) {
                    Ok(token) => HttpResponse::Ok().json(TokenResponse { auth_token: token }),
                    Err(_) => HttpResponse::InternalServerError().body("Token generation failed"),
                }
            } else {
                let failed_signins = operator.failed_signins.unwrap_or(0) + 1;
                let update = doc! { "$set": { "failed_signins": failed_signins } };

                match collection
                    .update_one(doc! { "email": &input.email }, update)
                    .await
                {
                    Ok(_) => HttpResponse::Unauthorized().body("Invalid credentials"),
                    Err(err) => {
                        eprintln!("Failed to update failed signins: {:?}", err);
                        HttpResponse::InternalServerError().body("Failed to process signin")
                    }
                }
            }
        }
        Ok(None) => HttpResponse::Unauthorized().body("Invalid credentials"),
        Err(err) => {
            eprintln!("Database error: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to sign in.")
        }
    }
}

/// Echo the validated claims back so the admin UI can restore a session.
pub async fn operator_session(claims: Claims) -> impl Responder {
    HttpResponse::Ok().json(claims)
}

pub fn generate_token(email: &str, operator_id: ObjectId) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(12)).timestamp() as usize,
        operator_id: operator_id.to_hex(),
    };

    let key = std::env::var("JWT_SECRET").unwrap_or_else(|_| "default_secret".to_string());
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(key.as_bytes()),
    )
}
