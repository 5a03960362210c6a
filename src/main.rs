// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Ajaxcart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Ajaxcart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Ajaxcart CLI entrypoint.
//!
//! By default this serves the in-memory storefront cart at `http://127.0.0.1:<port>`.
//!
//! Use `--demo` to run a scripted shopper session against it instead and print the cart surface
//! after every step.

use std::error::Error;
use std::sync::{Arc, Mutex};

use ajaxcart::config::{CartSettings, Timings};
use ajaxcart::model::{LineNumber, VariantId};
use ajaxcart::presentation::{HeadlessPage, Surface};
use ajaxcart::stepper::{StepDirection, StepperKind};
use ajaxcart::stub::{self, StubStore};
use ajaxcart::{AddItemRequest, CartSynchronizer, EventOutcome, HttpCartApi, UiEvent};
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 27436;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--port <port>]\n  {program} --demo [--port <port>] [--method <drawer|modal|flip>]\n\nServes the storefront cart endpoints (/cart.js, /cart/add.js, /cart/change.js, /cart/update.js)\nat `http://127.0.0.1:<port>`.\n--port selects the port (0 = ephemeral; default {DEFAULT_PORT}).\n\n--demo runs a scripted session against the endpoints and prints the cart surface.\n--method selects the presentation mode for --demo (default drawer).\n\nLog filtering follows RUST_LOG (default info)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    port: Option<u16>,
    method: Option<String>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--port" => {
                if options.port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.port = Some(port);
            }
            "--method" => {
                if options.method.is_some() {
                    return Err(());
                }
                options.method = Some(args.next().ok_or(())?);
            }
            _ => return Err(()),
        }
    }

    if options.method.is_some() && !options.demo {
        return Err(());
    }

    Ok(options)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "ajaxcart".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_tracing();

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(run(options))
    })();

    if let Err(err) = result {
        eprintln!("ajaxcart: {err}");
        std::process::exit(1);
    }
}

async fn run(options: CliOptions) -> Result<(), Box<dyn Error>> {
    let port = options.port.unwrap_or(DEFAULT_PORT);
    let store = Arc::new(Mutex::new(StubStore::demo()));
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "storefront cart listening");

    if !options.demo {
        stub::serve(listener, store).await?;
        return Ok(());
    }

    let server_handle = tokio::spawn(async move {
        if let Err(err) = stub::serve(listener, store).await {
            tracing::error!(error = %err, "storefront server error");
        }
    });

    let method = options.method.unwrap_or_else(|| "drawer".to_owned());
    let demo = run_demo(&format!("http://{addr}"), method).await;
    server_handle.abort();
    demo
}

async fn run_demo(base_url: &str, method: String) -> Result<(), Box<dyn Error>> {
    let config = CartSettings { method, ..CartSettings::default() }
        .validate()?
        .with_timings(Timings::immediate());
    let sync = CartSynchronizer::new(HttpCartApi::new(base_url), HeadlessPage::default(), config);

    let first = LineNumber::new(1)?;
    let second = LineNumber::new(2)?;
    let steps = [
        ("add 2 x Linen Shirt", UiEvent::AddFormSubmitted(AddItemRequest::variant(VariantId(101), 2))),
        ("add Canvas Tote", UiEvent::AddFormSubmitted(AddItemRequest::variant(VariantId(202), 1))),
        (
            "increment line 1",
            UiEvent::StepperClicked {
                kind: StepperKind::CartBound { line: Some(first) },
                direction: StepDirection::Increment,
                value: "2".to_owned(),
            },
        ),
        ("add 2 x Enamel Mug", UiEvent::AddFormSubmitted(AddItemRequest::variant(VariantId(303), 2))),
        ("remove line 2", UiEvent::RemoveClicked { line: Some(second) }),
        ("remove line 1", UiEvent::RemoveClicked { line: Some(first) }),
    ];

    for (label, event) in steps {
        let outcome = sync.handle(event).await;
        print_step(label, &outcome, &sync.surface());
    }
    Ok(())
}

fn print_step(label: &str, outcome: &EventOutcome, surface: &Surface) {
    println!("== {label} -> {outcome:?}");
    let badge = surface.badge();
    let count = if badge.count_hidden { "-".to_owned() } else { badge.count.to_string() };
    println!(
        "visible={} height={:?} count={count} total={}",
        surface.is_visible(),
        surface.height_px(),
        badge.total
    );
    if let Some(error) = surface.inline_error() {
        println!("error: {}", error.description);
    }
    if let Some(alert) = surface.alert() {
        println!("alert: {alert}");
    }
    if let Some(markup) = surface.content().markup() {
        println!("{markup}");
    }
    println!();
}
