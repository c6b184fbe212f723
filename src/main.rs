#[actix_web::main]
async fn main() -> std::io::Result<()> {
    certificate_generator_server::run().await
}
