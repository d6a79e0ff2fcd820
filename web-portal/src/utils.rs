macro_rules! internal_server_error {
    () => {
        HttpResponse::InternalServerError()
            .body("Error within the server that cannot be recovered. Contact administrator")
    };
}

macro_rules! html {
    ($html:ident) => {{
        $html.insert_str(0, "<!DOCTYPE html>");
        HttpResponse::Ok()
            .content_type(actix_web::http::header::ContentType::html())
            .body($html)
    }};
}

macro_rules! redirect {
    ($location:literal) => {
        HttpResponse::Found()
            .insert_header(("location", $location))
            .finish()
    };
}

macro_rules! redirect_login {
    () => {
        HttpResponse::Found()
            .insert_header(("location", "/"))
            .finish()
    };
}

pub(crate) use html;
pub(crate) use internal_server_error;
pub(crate) use redirect;
pub(crate) use redirect_login;
