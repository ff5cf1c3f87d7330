use reqwest::blocking::{Request, Response};

/// Executes one HTTP request, blocking until the response headers arrive.
///
/// [`BasicClient`](super::BasicClient) is the plain implementation; the
/// wrappers in [`auth`](super::auth) decorate any other implementation.
pub trait HttpClient: Send + Sync {
    fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

impl<C: HttpClient + ?Sized> HttpClient for Box<C> {
    fn execute(&self, req: Request) -> reqwest::Result<Response> {
        (**self).execute(req)
    }
}
