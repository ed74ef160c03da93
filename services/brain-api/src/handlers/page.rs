//! The single-page upload form.

use axum::response::Html;

use crate::metrics;

/// GET / - the upload form and result panel, served as a static page.
pub async fn page_handler() -> Html<&'static str> {
    metrics::record_page_request();
    Html(PAGE)
}

const PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Brain GIF Generator</title>
<style>
  body { font-family: sans-serif; max-width: 760px; margin: 2rem auto; color: #222; }
  fieldset { border: 1px solid #ccc; border-radius: 6px; margin-bottom: 1rem; }
  label { display: block; margin: 0.6rem 0 0.2rem; font-weight: 600; }
  select, input[type=number] { width: 12rem; }
  button { padding: 0.5rem 1.5rem; font-size: 1rem; }
  #status { color: #b00020; min-height: 1.4rem; }
  img { max-width: 100%; border: 1px solid #ddd; }
</style>
</head>
<body>
<h1>Brain GIF Generator</h1>
<p>Upload your source estimate file (<code>.stc</code> or <code>.w</code>) and customize
the visualization to generate an animated GIF of brain activity over time.</p>

<form id="controls">
  <fieldset>
    <legend>Source estimate</legend>
    <label for="file">Upload your .stc or .w file</label>
    <input type="file" id="file" name="file" accept=".stc,.w">
  </fieldset>

  <fieldset>
    <legend>Display customization</legend>
    <label><input type="checkbox" name="transparent" id="transparent"> Transparent background</label>
    <label for="colormap">Colormap</label>
    <select name="colormap" id="colormap">
      <option value="hot" selected>hot</option>
      <option value="viridis">viridis</option>
      <option value="plasma">plasma</option>
      <option value="inferno">inferno</option>
      <option value="magma">magma</option>
      <option value="coolwarm">coolwarm</option>
      <option value="RdBu_r">RdBu_r</option>
    </select>
    <label for="background">Background color (ignored while transparent is on)</label>
    <select name="background" id="background">
      <option value="white" selected>white</option>
      <option value="black">black</option>
    </select>
    <label><input type="checkbox" name="colorbar" id="colorbar"> Show colorbar</label>
    <label for="cortex">Cortex style</label>
    <select name="cortex" id="cortex">
      <option value="low_contrast" selected>low_contrast</option>
      <option value="classic">classic</option>
      <option value="high_contrast">high_contrast</option>
    </select>
    <label for="hemi">Hemisphere</label>
    <select name="hemi" id="hemi">
      <option value="split" selected>split</option>
      <option value="lh">lh</option>
      <option value="rh">rh</option>
    </select>
    <label for="views">View(s)</label>
    <select name="views" id="views" multiple size="8">
      <option value="lateral" selected>lateral</option>
      <option value="medial">medial</option>
      <option value="rostral">rostral</option>
      <option value="caudal">caudal</option>
      <option value="dorsal">dorsal</option>
      <option value="ventral">ventral</option>
      <option value="frontal">frontal</option>
      <option value="parietal">parietal</option>
    </select>
    <label for="smoothing_steps">Smoothing steps (1-20)</label>
    <input type="number" name="smoothing_steps" id="smoothing_steps" min="1" max="20" value="5">
  </fieldset>

  <fieldset>
    <legend>Animation settings</legend>
    <label for="time_stride">Time step for frames (1-50)</label>
    <input type="number" name="time_stride" id="time_stride" min="1" max="50" value="20">
    <label for="frame_duration">Frame duration in seconds (0.05-0.5)</label>
    <input type="number" name="frame_duration" id="frame_duration" min="0.05" max="0.5" step="0.01" value="0.1">
  </fieldset>

  <button type="submit">Generate GIF</button>
</form>

<p id="status"></p>
<div id="result" hidden>
  <img id="animation" alt="Brain activity animation">
  <p><a id="download">Download GIF</a></p>
</div>

<script>
const form = document.getElementById('controls');
const transparent = document.getElementById('transparent');
const background = document.getElementById('background');

transparent.addEventListener('change', () => {
  background.disabled = transparent.checked;
});

form.addEventListener('submit', async (event) => {
  event.preventDefault();
  const status = document.getElementById('status');
  const result = document.getElementById('result');
  result.hidden = true;
  status.textContent = 'Generating...';
  try {
    const response = await fetch('/generate', { method: 'POST', body: new FormData(form) });
    if (!response.ok) {
      const body = await response.json();
      status.textContent = body.message;
      return;
    }
    const blob = await response.blob();
    const url = URL.createObjectURL(blob);
    document.getElementById('animation').src = url;
    const link = document.getElementById('download');
    link.href = url;
    link.download = 'brain_animation_' + form.elements['hemi'].value + '.gif';
    status.textContent = '';
    result.hidden = false;
  } catch (err) {
    status.textContent = 'An error occurred during GIF generation: ' + err;
  }
});
</script>
</body>
</html>
"##;
