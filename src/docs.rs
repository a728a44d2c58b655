// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Estoque Fácil API", description = "Estoque, vendas e aprovação de contas"),
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Produtos ---
        handlers::produtos::list_produtos,
        handlers::produtos::get_produto,
        handlers::produtos::create_produto,
        handlers::produtos::update_produto,
        handlers::produtos::delete_produto,

        // --- Vendas ---
        handlers::vendas::list_vendas,
        handlers::vendas::get_venda,
        handlers::vendas::registrar_venda,
        handlers::vendas::cancelar_venda,

        // --- Settings ---
        handlers::settings::get_profit_margin,
        handlers::settings::update_profit_margin,

        // --- Relatórios ---
        handlers::relatorios::get_resumo,
        handlers::relatorios::get_top_produtos,

        // --- Admin ---
        handlers::admin::list_pending,
        handlers::admin::list_all,
        handlers::admin::approve_user,
        handlers::admin::reject_user,
        handlers::admin::block_user,
        handlers::admin::unblock_user,
        handlers::admin::delete_user,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::DocumentType,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::BlockUserPayload,

            // --- Produtos ---
            models::produto::Produto,
            models::produto::ProdutoForm,

            // --- Vendas ---
            models::venda::Venda,
            models::venda::VendaDetalhe,
            models::venda::RegistrarVendaPayload,

            // --- Settings ---
            models::settings::ProfitMargin,
            models::settings::UpdateProfitMarginRequest,

            // --- Relatórios ---
            models::relatorio::ResumoRelatorio,
            models::relatorio::TopProduto,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Produtos", description = "Catálogo de produtos com preço sugerido"),
        (name = "Vendas", description = "Registro e cancelamento de vendas"),
        (name = "Settings", description = "Margem de lucro global"),
        (name = "Relatórios", description = "Indicadores de vendas e estoque"),
        (name = "Admin", description = "Aprovação, bloqueio e exclusão de contas")
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/register",
            "/api/produtos/{id}",
            "/api/vendas",
            "/api/settings/profit-margin",
            "/api/admin/users/{id}/block",
            "/api/relatorios/top-produtos",
        ] {
            assert!(doc.paths.paths.contains_key(path), "faltando {path}");
        }
    }
}
