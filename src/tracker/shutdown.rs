use tokio::select;
use tokio_util::sync::CancellationToken;

/// Detects signals sent to the process and requests a tracker shutdown.
/// Cancelling an already-cancelled token is a no-op, so this can race with
/// `quit` from the interactive source without consequence.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancelation.cancel();
        },
        _ = cancelation.cancelled() => (),
    };
}
