// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::refresh_token,
        handlers::password_reset::request_reset,
        handlers::password_reset::verify_code,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::get_user,
        handlers::auth::update_user,
        handlers::auth::delete_user,

        // --- Sellers ---
        handlers::sellers::list_sellers,
        handlers::sellers::create_seller,
        handlers::sellers::get_seller,
        handlers::sellers::update_seller,
        handlers::sellers::delete_seller,

        // --- Groups ---
        handlers::groups::create_group,
        handlers::groups::list_groups,
        handlers::groups::get_group,
        handlers::groups::delete_group,

        // --- Products ---
        handlers::products::create_product,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Units ---
        handlers::units::create_unit,
        handlers::units::get_unit,
        handlers::units::update_unit,
        handlers::units::delete_unit,

        // --- History ---
        handlers::history::get_history,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::UserBrief,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::UpdateProfilePayload,
            models::auth::RefreshTokenPayload,
            models::auth::AuthResponse,
            models::auth::AccessTokenResponse,
            models::auth::PasswordResetRequestPayload,
            models::auth::VerifyResetCodePayload,
            models::auth::MessageResponse,

            // --- Inventory ---
            models::inventory::Seller,
            models::inventory::Group,
            models::inventory::Product,
            models::inventory::ProductSize,

            // --- Reports ---
            models::reports::GroupSummary,
            models::reports::GroupDetail,
            models::reports::SizeBrief,
            models::reports::ProductSummary,
            models::reports::ProductDetail,
            models::reports::UnitDetail,
            models::reports::HistoryView,
            models::reports::HistoryItemView,
            models::reports::SoldProductView,
            models::reports::SoldUnitView,
            models::reports::SellerNameView,

            // --- Payloads ---
            handlers::groups::CreateGroupPayload,
            handlers::products::CreateProductPayload,
            handlers::products::UpdateProductPayload,
            handlers::units::CreateUnitPayload,
            handlers::units::UpdateUnitPayload,
            handlers::sellers::SellerPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação, tokens e redefinição de senha"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Sellers", description = "Vendedores do usuário"),
        (name = "Groups", description = "Lotes de compra datados, com totais"),
        (name = "Products", description = "Produtos de um lote"),
        (name = "Units", description = "Unidades (tamanhos) em estoque ou vendidas"),
        (name = "History", description = "Histórico de vendas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
