use std::net::SocketAddr;

use anyhow::Result;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use clap::Parser;
use ps_core::auth;
use ps_core::auth::github::GithubClient;
use ps_core::store::Library;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ps_server::schema::{self, AppSchema};

/// PhotoShare API server.
#[derive(Parser)]
struct Args {
	/// Port to listen on.
	#[arg(long, env = "PORT", default_value_t = 4000)]
	port: u16,

	/// GitHub OAuth app client id.
	#[arg(long, env = "GITHUB_CLIENT_ID")]
	github_client_id: String,

	/// GitHub OAuth app client secret.
	#[arg(long, env = "GITHUB_CLIENT_SECRET")]
	github_client_secret: String,
}

#[derive(Clone)]
struct AppState {
	schema: AppSchema,
	library: Library,
}

#[tokio::main]
async fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
		.init();

	let args = Args::parse();

	let library = Library::in_memory();
	let github = GithubClient::new(args.github_client_id, args.github_client_secret);
	let schema = schema::build(library.clone(), github);

	let app = Router::new()
		.route("/", get(|| async { "Welcome to the PhotoShare API" }))
		.route("/health", get(|| async { "OK" }))
		.route("/graphql", get(graphiql).post(graphql_handler))
		.layer(CorsLayer::permissive())
		.with_state(AppState { schema, library });

	// This listens on IPv6 and IPv4
	let mut addr = "[::]:4000".parse::<SocketAddr>()?;
	addr.set_port(args.port);
	info!("Listening on http://localhost:{}", args.port);
	info!(
		"GraphQL playground on http://localhost:{}/graphql",
		args.port
	);

	let listener = tokio::net::TcpListener::bind(addr).await?;
	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn graphql_handler(
	State(state): State<AppState>,
	bearer: Option<TypedHeader<Authorization<Bearer>>>,
	req: GraphQLRequest,
) -> GraphQLResponse {
	// The acting identity is derived fresh on every request; no session
	// outlives this lookup.
	let token = bearer.as_ref().map(|TypedHeader(auth)| auth.token());
	let current = match auth::current_user(&state.library, token).await {
		Ok(current) => current,
		Err(err) => {
			error!("current user lookup failed: {err}");
			return async_graphql::Response::from_errors(vec![async_graphql::ServerError::new(
				"store call failed",
				None,
			)])
			.into();
		}
	};

	state
		.schema
		.execute(req.into_inner().data(current))
		.await
		.into()
}

async fn graphiql() -> impl IntoResponse {
	Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn shutdown_signal() {
	let _ = tokio::signal::ctrl_c().await;
	info!("shutting down");
}
