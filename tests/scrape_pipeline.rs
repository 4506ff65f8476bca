//! End-to-end pipeline tests against a mocked upstream report site.

use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vitibrasil_api::catalog::{ImportProduct, ProcessingGroup};
use vitibrasil_api::pipeline;
use vitibrasil_api::scrape::UpstreamClient;
use vitibrasil_api::Error;

const PRODUCTION_HTML: &str = r#"
<html><body>
<table class="tb_dados">
  <thead><tr><th>Produto</th><th>Quantidade (L.)</th></tr></thead>
  <tbody>
    <tr><td class="tb_item">VINHO DE MESA</td><td class="tb_item">169.762.429</td></tr>
    <tr><td class="tb_subitem">Tinto</td><td class="tb_subitem">139.320.884</td></tr>
    <tr><td class="tb_subitem">Branco</td><td class="tb_subitem">27.910.299</td></tr>
    <tr><td class="tb_item">SUCO DE UVA</td><td class="tb_item">-</td></tr>
  </tbody>
</table>
</body></html>"#;

const TRADE_HTML: &str = r#"
<html><body>
<table class="tb_dados">
  <tbody>
    <tr><td>Argentina</td><td>5.846.504</td><td>10.306.442</td></tr>
    <tr><td>Chile</td><td>1.234,56</td><td>-</td></tr>
  </tbody>
</table>
</body></html>"#;

fn client_for(server: &MockServer) -> UpstreamClient {
    UpstreamClient::new(format!("{}/index.php", server.uri()), 2).unwrap()
}

#[tokio::test]
async fn production_pipeline_classifies_and_totals() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("opcao", "opt_02"))
        .and(query_param("ano", "2023"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PRODUCTION_HTML))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let report = pipeline::producao(&client, 2023).await.unwrap();

    assert_eq!(report.ano_referencia, 2023);
    assert_eq!(report.dados.len(), 4);
    assert_eq!(report.dados[0].produto, "VINHO DE MESA");
    assert_eq!(report.dados[0].sub_produto, None);
    assert_eq!(report.dados[1].sub_produto.as_deref(), Some("Tinto"));
    assert_eq!(report.dados[1].quantidade_litros, Some(139_320_884.0));
    // The sentinel row contributes nothing to the total but is still listed.
    assert_eq!(report.dados[3].quantidade_litros, None);
    assert_eq!(
        report.total_geral_litros,
        169_762_429.0 + 139_320_884.0 + 27_910_299.0
    );
}

#[tokio::test]
async fn missing_table_is_empty_result_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Sem dados</body></html>"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let report = pipeline::producao(&client, 1971).await.unwrap();
    assert!(report.dados.is_empty());
    assert_eq!(report.total_geral_litros, 0.0);
}

#[tokio::test]
async fn upstream_error_status_fails_the_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = pipeline::producao(&client, 2020).await.unwrap_err();
    assert!(matches!(err, Error::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn upstream_timeout_fails_the_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PRODUCTION_HTML)
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let client = UpstreamClient::new(format!("{}/index.php", server.uri()), 1).unwrap();
    let err = pipeline::producao(&client, 2020).await.unwrap_err();
    assert!(matches!(err, Error::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn processing_pipeline_sends_subopcao_and_tags_items() {
    let server = MockServer::start().await;
    let html = r#"<table class="tb_dados"><tbody>
        <tr><td>Isabel</td><td>1.234</td></tr>
        <tr><td>Bordo</td><td>-</td></tr>
        </tbody></table>"#;
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("opcao", "opt_03"))
        .and(query_param("subopcao", "subopt_02"))
        .and(query_param("ano", "2022"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let report = pipeline::processamento(&client, 2022, ProcessingGroup::AmericanasHibridas)
        .await
        .unwrap();

    assert_eq!(report.tipo, "americanas_hibridas");
    assert_eq!(report.dados.len(), 2);
    assert_eq!(report.dados[0].tipo, "americanas_hibridas");
    assert_eq!(report.total_geral_kg, 1234.0);
}

#[tokio::test]
async fn default_import_product_sends_no_subopcao() {
    let server = MockServer::start().await;
    // Table wines are the site's default report: no subopcao parameter.
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("opcao", "opt_05"))
        .and(query_param("ano", "2021"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TRADE_HTML))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let report = pipeline::importacao(&client, 2021, ImportProduct::VinhosMesa)
        .await
        .unwrap();

    assert_eq!(report.tipo, "vinhos_mesa");
    assert_eq!(report.dados[0].pais, "Argentina");
    assert_eq!(report.dados[0].quantidade_kg, Some(5_846_504.0));
    assert_eq!(report.dados[1].quantidade_kg, Some(1234.56));
    assert_eq!(report.dados[1].valor_usd, None);
    assert_eq!(report.total_geral_kg, 5_847_738.56);
    assert_eq!(report.total_geral_usd, 10_306_442.0);
}

#[tokio::test]
async fn failing_subtype_does_not_affect_another() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("opcao", "opt_05"))
        .and(query_param("subopcao", "subopt_02"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("opcao", "opt_05"))
        .and(query_param("subopcao", "subopt_05"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TRADE_HTML))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let failed = pipeline::importacao(&client, 2021, ImportProduct::Espumantes).await;
    assert!(failed.is_err());

    let ok = pipeline::importacao(&client, 2021, ImportProduct::SucoUva)
        .await
        .unwrap();
    assert_eq!(ok.dados.len(), 2);
}

#[tokio::test]
async fn re_extraction_is_deterministic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PRODUCTION_HTML))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = pipeline::producao(&client, 2023).await.unwrap();
    let second = pipeline::producao(&client, 2023).await.unwrap();
    assert_eq!(first, second);
}
