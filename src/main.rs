use hookgate::hook::FAIL_OPEN_RESPONSE;
use hookgate::HookRunner;
use std::io::{self, Read, Write};
use std::panic;

/// Read one request from stdin and produce the JSON verdict
fn run() -> String {
    let runner = HookRunner::from_environment();

    let mut input = String::new();
    let response = match io::stdin().read_to_string(&mut input) {
        Ok(_) => runner.handle(&input),
        Err(e) => runner.handle_read_error(e),
    };

    response
        .to_json()
        .unwrap_or_else(|_| FAIL_OPEN_RESPONSE.to_string())
}

fn main() {
    // Keep panics off stdout; the caller only ever sees a verdict
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("hookgate: internal fault, allowing: {}", panic_info);
    }));

    let payload = panic::catch_unwind(run).unwrap_or_else(|_| FAIL_OPEN_RESPONSE.to_string());

    // Always exit 0: the decision is carried in the payload, not the exit code
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", payload);
    let _ = stdout.flush();
}
