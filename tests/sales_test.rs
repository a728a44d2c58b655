//! Sale registration and cancellation against product stock.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, num_field, str_field};

#[tokio::test]
async fn sell_fail_and_cancel_keep_stock_consistent() {
    let app = TestApp::new().await;
    let (_, token) = app.bootstrap_admin().await;
    let produto = app.create_produto(&token, "Camiseta", "10", "100").await;
    let id = str_field(&produto, "id").to_string();

    let venda = app.vender(&token, &id, 30, 15.0).await;
    assert_eq!(venda.status, StatusCode::CREATED);
    assert_eq!(num_field(&venda.body, "valorTotal"), 450.0);
    assert_eq!(str_field(&venda.body, "produtoNome"), "Camiseta");
    let venda_id = str_field(&venda.body, "id").to_string();
    assert_eq!(num_field(&app.produto(&token, &id).await, "quantidadeDisponivel"), 70.0);

    let too_many = app.vender(&token, &id, 80, 15.0).await;
    assert_eq!(too_many.status, StatusCode::BAD_REQUEST);
    assert_eq!(too_many.body["details"]["code"], "INSUFFICIENT_STOCK");
    assert_eq!(too_many.body["details"]["available"], 70);
    assert_eq!(num_field(&app.produto(&token, &id).await, "quantidadeDisponivel"), 70.0);

    let cancel = app.request("DELETE", &format!("/api/vendas/{venda_id}"), None, Some(&token)).await;
    assert_eq!(cancel.status, StatusCode::NO_CONTENT);
    assert_eq!(num_field(&app.produto(&token, &id).await, "quantidadeDisponivel"), 100.0);

    let again = app.request("DELETE", &format!("/api/vendas/{venda_id}"), None, Some(&token)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(num_field(&app.produto(&token, &id).await, "quantidadeDisponivel"), 100.0);
}

#[tokio::test]
async fn selling_exactly_the_available_quantity_empties_stock() {
    let app = TestApp::new().await;
    let (_, token) = app.bootstrap_admin().await;
    let produto = app.create_produto(&token, "Agenda", "4", "3").await;
    let id = str_field(&produto, "id").to_string();

    assert_eq!(app.vender(&token, &id, 3, 6.0).await.status, StatusCode::CREATED);
    assert_eq!(num_field(&app.produto(&token, &id).await, "quantidadeDisponivel"), 0.0);

    let none_left = app.vender(&token, &id, 1, 6.0).await;
    assert_eq!(none_left.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_sale_payloads_are_rejected() {
    let app = TestApp::new().await;
    let (_, token) = app.bootstrap_admin().await;
    let produto = app.create_produto(&token, "Régua", "1", "10").await;
    let id = str_field(&produto, "id").to_string();

    let zero = app.vender(&token, &id, 0, 2.0).await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);

    let negative_price = app.vender(&token, &id, 1, -2.0).await;
    assert_eq!(negative_price.status, StatusCode::BAD_REQUEST);

    let missing = app
        .request("POST", "/api/vendas", Some(json!({"produtoId": id})), Some(&token))
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let unknown_product = app.vender(&token, &uuid::Uuid::new_v4().to_string(), 1, 2.0).await;
    assert_eq!(unknown_product.status, StatusCode::NOT_FOUND);

    assert_eq!(num_field(&app.produto(&token, &id).await, "quantidadeDisponivel"), 10.0);
}

#[tokio::test]
async fn sales_of_other_accounts_are_hidden() {
    let app = TestApp::new().await;
    let (_, admin_token) = app.bootstrap_admin().await;
    let (_, bob_token) = app.approved_user(&admin_token, "bob").await;

    let produto = app.create_produto(&admin_token, "Privado", "5", "10").await;
    let id = str_field(&produto, "id").to_string();
    let venda = app.vender(&admin_token, &id, 2, 8.0).await;
    let venda_id = str_field(&venda.body, "id").to_string();

    // Bob não vende produto alheio
    let foreign_sale = app.vender(&bob_token, &id, 1, 8.0).await;
    assert_eq!(foreign_sale.status, StatusCode::NOT_FOUND);

    let get = app.request("GET", &format!("/api/vendas/{venda_id}"), None, Some(&bob_token)).await;
    assert_eq!(get.status, StatusCode::NOT_FOUND);

    let cancel = app.request("DELETE", &format!("/api/vendas/{venda_id}"), None, Some(&bob_token)).await;
    assert_eq!(cancel.status, StatusCode::NOT_FOUND);

    let list = app.request("GET", "/api/vendas", None, Some(&bob_token)).await;
    assert_eq!(list.body.as_array().unwrap().len(), 0);

    assert_eq!(num_field(&app.produto(&admin_token, &id).await, "quantidadeDisponivel"), 8.0);
}

#[tokio::test]
async fn sale_detail_joins_product_fields() {
    let app = TestApp::new().await;
    let (_, token) = app.bootstrap_admin().await;
    let produto = app.create_produto(&token, "Mochila", "40", "10").await;
    let id = str_field(&produto, "id").to_string();

    let venda = app
        .request(
            "POST",
            "/api/vendas",
            Some(json!({
                "produtoId": id,
                "quantidadeVendida": 2,
                "precoVenda": 59.9,
                "observacoes": "Cliente antigo",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(venda.status, StatusCode::CREATED);
    assert_eq!(num_field(&venda.body, "valorTotal"), 119.8);
    let venda_id = str_field(&venda.body, "id").to_string();

    let detail = app.request("GET", &format!("/api/vendas/{venda_id}"), None, Some(&token)).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(num_field(&detail.body, "precoCompra"), 40.0);
    assert_eq!(num_field(&detail.body, "quantidadeDisponivel"), 8.0);
    assert_eq!(str_field(&detail.body, "observacoes"), "Cliente antigo");

    let list = app.request("GET", "/api/vendas", None, Some(&token)).await;
    assert_eq!(list.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn reports_summarize_sales_and_stock() {
    let app = TestApp::new().await;
    let (_, token) = app.bootstrap_admin().await;

    let camiseta = app.create_produto(&token, "Camiseta", "10", "100").await;
    let bone = app.create_produto(&token, "Boné", "5", "2").await;
    let camiseta_id = str_field(&camiseta, "id").to_string();
    let bone_id = str_field(&bone, "id").to_string();

    app.vender(&token, &camiseta_id, 30, 15.0).await;
    app.vender(&token, &bone_id, 2, 9.0).await;

    let resumo = app.request("GET", "/api/relatorios/resumo", None, Some(&token)).await;
    assert_eq!(resumo.status, StatusCode::OK);
    assert_eq!(num_field(&resumo.body, "totalVendas"), 2.0);
    assert_eq!(num_field(&resumo.body, "unidadesVendidas"), 32.0);
    assert_eq!(num_field(&resumo.body, "faturamento"), 468.0);
    assert_eq!(num_field(&resumo.body, "custoVendas"), 310.0);
    assert_eq!(num_field(&resumo.body, "lucroBruto"), 158.0);
    assert_eq!(num_field(&resumo.body, "unidadesEmEstoque"), 70.0);
    assert_eq!(num_field(&resumo.body, "valorEmEstoque"), 700.0);
    assert_eq!(num_field(&resumo.body, "produtosEsgotados"), 1.0);

    let top = app
        .request("GET", "/api/relatorios/top-produtos?limite=1", None, Some(&token))
        .await;
    assert_eq!(top.status, StatusCode::OK);
    let ranking = top.body.as_array().unwrap();
    assert_eq!(ranking.len(), 1);
    assert_eq!(ranking[0]["nome"], "Camiseta");
    assert_eq!(ranking[0]["quantidadeVendida"], 30);
}

#[tokio::test]
async fn huge_quantity_and_price_fail_as_insufficient_stock() {
    let app = TestApp::new().await;
    let (_, token) = app.bootstrap_admin().await;
    let produto = app.create_produto(&token, "Caneta", "10", "10").await;
    let id = str_field(&produto, "id").to_string();

    let response = app.vender(&token, &id, 9_000_000_000_000_000_000, 1e12).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST, "{:?}", response.body);
    assert_eq!(response.body["details"]["code"], "INSUFFICIENT_STOCK");
    assert_eq!(response.body["details"]["available"], 10);
    assert_eq!(num_field(&app.produto(&token, &id).await, "quantidadeDisponivel"), 10.0);
}

#[tokio::test]
async fn sale_total_beyond_storable_range_is_rejected_and_stock_restored() {
    let app = TestApp::new().await;
    let (_, token) = app.bootstrap_admin().await;
    let produto = app.create_produto(&token, "Parafuso", "1", "1000000000").await;
    let id = str_field(&produto, "id").to_string();

    // 10^9 unidades × R$ 10^12 não cabe em centavos
    let response = app.vender(&token, &id, 1_000_000_000, 1e12).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST, "{:?}", response.body);
    assert_eq!(num_field(&app.produto(&token, &id).await, "quantidadeDisponivel"), 1e9);

    let above_max_price = app.vender(&token, &id, 1, 1e13).await;
    assert_eq!(above_max_price.status, StatusCode::BAD_REQUEST);

    let list = app.request("GET", "/api/vendas", None, Some(&token)).await;
    assert!(list.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn summary_handles_values_beyond_sqlite_integer_range() {
    let app = TestApp::new().await;
    let (_, token) = app.bootstrap_admin().await;
    let produto = app.create_produto(&token, "Lote", "1000000000000", "1000000000").await;
    let id = str_field(&produto, "id").to_string();
    app.create_produto(&token, "Lote 2", "1000000000000", "1000000000").await;

    let venda = app.vender(&token, &id, 10_000, 1e12).await;
    assert_eq!(venda.status, StatusCode::CREATED, "{:?}", venda.body);

    let resumo = app.request("GET", "/api/relatorios/resumo", None, Some(&token)).await;
    assert_eq!(resumo.status, StatusCode::OK, "{:?}", resumo.body);

    // (10^9 - 10^4 + 10^9) unidades × R$ 10^12
    let esperado = 1_999_990_000.0 * 1e12;
    let valor = num_field(&resumo.body, "valorEmEstoque");
    assert!((valor - esperado).abs() / esperado < 1e-9, "{valor}");
    assert_eq!(num_field(&resumo.body, "unidadesEmEstoque"), 1_999_990_000.0);

    let faturamento = num_field(&resumo.body, "faturamento");
    assert!((faturamento - 1e16).abs() / 1e16 < 1e-9, "{faturamento}");
    assert_eq!(num_field(&resumo.body, "lucroBruto"), 0.0);
}
