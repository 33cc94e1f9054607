use base64::{engine::general_purpose::STANDARD, Engine};
use eye_guardian_inference::{Diagnosis, Prediction};

const TITLE: &str = "ResNet-50: Glaucoma Detection Assistant";

pub const NO_UPLOAD_WARNING: &str =
    "You haven't uploaded an image file yet. Please upload a jpg image to proceed.";

pub enum PageBody {
    AwaitingUpload,
    Prediction {
        prediction: Prediction,
        preview_png: Vec<u8>,
    },
    Error(String),
}

pub fn error_message(err: &impl std::fmt::Display) -> String {
    format!("Error processing the image: {}", err)
}

pub fn render_page(body: &PageBody) -> String {
    let outcome = match body {
        PageBody::AwaitingUpload => {
            format!(r#"<div class="alert alert-warning">{}</div>"#, NO_UPLOAD_WARNING)
        }
        PageBody::Prediction {
            prediction,
            preview_png,
        } => render_prediction(prediction, preview_png),
        PageBody::Error(message) => {
            format!(r#"<div class="alert alert-error">{}</div>"#, escape(message))
        }
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
{sidebar}
<main class="main">
    <h1>{title}</h1>
    <p>Welcome to the Glaucoma Detector! Please upload a fundus image of your eye to receive an assessment.</p>
    <h3>Upload your fundus eye image (JPG format)</h3>
    <form method="post" action="/" enctype="multipart/form-data">
        <input type="file" name="file" accept=".jpg,.jpeg,image/jpeg">
        <button type="submit">Analyze</button>
    </form>
    {outcome}
    <hr>
    <p><strong>Note:</strong> This tool is for my <strong>Bachelor Thesis</strong> &amp; informational purposes only and should not be used as a substitute for professional medical advice.</p>
    <div class="footer">
        <p>&copy; 2024 Ali Ahmed Shawki El Badawi. All rights reserved.</p>
        <p>For more information, visit the <a href="https://www.glaucoma.org" target="_blank">Glaucoma Research Foundation</a>.</p>
    </div>
</main>
</body>
</html>
"#,
        title = TITLE,
        style = STYLE,
        sidebar = SIDEBAR,
        outcome = outcome,
    )
}

fn render_prediction(prediction: &Prediction, preview_png: &[u8]) -> String {
    let class = match prediction.diagnosis {
        Diagnosis::Healthy => "prediction-success",
        Diagnosis::GlaucomaSigns => "prediction-error",
    };

    format!(
        r#"<figure class="preview">
        <img src="data:image/png;base64,{preview}" width="100" height="100" alt="Uploaded Image">
        <figcaption>Uploaded Image</figcaption>
    </figure>
    <div class="prediction-box {class}" data-score="{score:.4}"><strong>Prediction:</strong> {message}</div>"#,
        preview = STANDARD.encode(preview_png),
        class = class,
        score = prediction.score,
        message = escape(prediction.diagnosis.message()),
    )
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const SIDEBAR: &str = r#"<aside class="sidebar">
    <h2>ResNet-50: Glaucoma Detection Assistant</h2>
    <div class="info">
        <p><strong>By: Ali Ahmed Shawki El Badawi</strong><br><strong>Supervised By: Dr Mahmoud Khalil</strong></p>
        <p>By simply uploading an image of the eye, users can receive an assessment that helps in identifying the presence of glaucoma, potentially saving vision through early intervention.</p>
    </div>
    <hr>
    <h2>About Glaucoma</h2>
    <p>Glaucoma is a group of eye conditions that damage the optic nerve, often caused by abnormally high pressure in the eye. It's one of the leading causes of blindness for people over the age of 60.</p>
    <p>For more information, visit <a href="https://www.glaucoma.org">Glaucoma Research Foundation</a>.</p>
</aside>"#;

const STYLE: &str = r#"
    * { box-sizing: border-box; }
    body { margin: 0; display: flex; min-height: 100vh; font-family: sans-serif; }
    .main {
        flex: 1;
        padding: 32px 48px;
        background: linear-gradient(160deg, #000000 30%, #242434 70%, #346496 100%);
        color: #FFFFFF;
    }
    .sidebar { width: 320px; padding: 24px; background-color: #333333; color: #FFFFFF; }
    .sidebar .info { background-color: #1c3d5a; border-radius: 6px; padding: 12px; }
    button {
        background-color: #4CAF50;
        color: white;
        padding: 10px 24px;
        border: none;
        cursor: pointer;
        border-radius: 4px;
        margin-top: 10px;
    }
    button:hover { background-color: #45a049; }
    .alert { border-radius: 6px; padding: 14px; margin: 20px 0; }
    .alert-warning { background-color: #fff3cd; color: #856404; }
    .alert-error { background-color: #f8d7da; color: #721c24; }
    .preview figcaption { font-size: 0.9em; color: #cccccc; }
    .prediction-box {
        border-radius: 10px;
        padding: 20px;
        margin: 20px 0;
        font-size: 1.5em;
        text-align: center;
    }
    .prediction-success { background-color: #d4edda; color: #155724; border: 2px solid #c3e6cb; }
    .prediction-error { background-color: #f8d7da; color: #721c24; border: 2px solid #f5c6cb; }
    .footer {
        margin-top: 50px;
        padding: 20px 0;
        background-color: #333333;
        text-align: center;
        font-size: 0.9em;
        color: #FFFFFF;
    }
    a { color: #1E90FF; }
"#;
