//! Embedded HTML/CSS/JS frontend for the campus energy dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies. Charts are drawn
//! as inline SVG from the `/api/dashboard` chart series.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Campus Energy Utility Dashboard</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --solar: #f2cc60;
  --grid: #58a6ff;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

/* Layout */
.app {
  display: grid;
  grid-template-columns: 280px 1fr;
  min-height: 100vh;
}

aside {
  background: var(--surface);
  border-right: 1px solid var(--border);
  padding: 20px;
}

aside h2 { font-size: 15px; margin-bottom: 16px; }
aside label.group { display: block; color: var(--text-muted); font-size: 12px; margin: 16px 0 8px; }

.area-list {
  max-height: 360px;
  overflow-y: auto;
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 6px 8px;
}
.area-list label { display: flex; gap: 8px; align-items: center; padding: 2px 0; cursor: pointer; }

.area-actions { display: flex; gap: 6px; margin-top: 8px; }
.area-actions button {
  flex: 1;
  padding: 4px 8px;
  border: 1px solid var(--border);
  border-radius: 6px;
  background: transparent;
  color: var(--text-muted);
  cursor: pointer;
}
.area-actions button:hover { color: var(--text); }

input[type=range] { width: 100%; }
.slider-value { float: right; color: var(--text); font-weight: 600; }

main { padding: 24px; max-width: 1200px; }

header {
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 22px; font-weight: 600; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

/* KPIs */
.kpis {
  display: grid;
  grid-template-columns: repeat(4, 1fr);
  gap: 16px;
  margin-bottom: 24px;
}
.kpi {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
}
.kpi .label { color: var(--text-muted); font-size: 12px; }
.kpi .value { font-size: 26px; font-weight: 600; }
.kpi .value.undefined { color: var(--yellow); font-size: 20px; }

/* Charts */
.charts {
  display: grid;
  grid-template-columns: 1fr 1fr;
  gap: 16px;
  margin-bottom: 24px;
}
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
}
.card h3 { font-size: 14px; margin-bottom: 12px; }
svg text { fill: var(--text-muted); font-size: 10px; }
svg .axis { stroke: var(--border); }

/* Messages */
.warning {
  display: none;
  border: 1px solid var(--yellow);
  color: var(--yellow);
  border-radius: var(--radius);
  padding: 14px 16px;
  margin-bottom: 24px;
}
.insights ul { margin: 8px 0 0 20px; }
.insights .target { margin-top: 10px; color: var(--green); font-weight: 600; }
.hidden { display: none !important; }
</style>
</head>
<body>
<div class="app">
  <aside>
    <h2>Campus Filters</h2>
    <label class="group">Select Campus Areas</label>
    <div class="area-list" id="area-list"></div>
    <div class="area-actions">
      <button id="select-all">All</button>
      <button id="select-none">None</button>
    </div>
    <label class="group">
      Minimum Occupancy (%) <span class="slider-value" id="occ-value">20</span>
    </label>
    <input type="range" id="occ" min="0" max="100" step="1" value="20">
  </aside>

  <main>
    <header>
      <h1>Campus Energy Utility &amp; Sustainability Dashboard</h1>
      <div class="subtitle">Synthetic daily energy, solar contribution and occupancy per campus area</div>
    </header>

    <div class="warning" id="warning"></div>

    <div id="normal">
      <div class="kpis" id="kpis"></div>
      <div class="charts">
        <div class="card"><h3>Energy Consumption by Area</h3><div id="chart-energy"></div></div>
        <div class="card"><h3>Solar vs Grid Energy Split</h3><div id="chart-split"></div></div>
        <div class="card"><h3>Occupancy vs Energy Demand</h3><div id="chart-scatter"></div></div>
        <div class="card"><h3>CO₂ Emissions by Area</h3><div id="chart-co2"></div></div>
      </div>
    </div>

    <div class="card insights" id="insights"></div>
  </main>
</div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
let areas = [];
let pending = null;

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {} };
  if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  return res.json();
}

function esc(s) {
  return String(s).replace(/[&<>"']/g, c => ({
    '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
  }[c]));
}

function fmt(n) {
  return Math.trunc(n).toLocaleString();
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------
function currentFilter() {
  const selected = [...document.querySelectorAll('#area-list input:checked')].map(i => i.value);
  return {
    selected_areas: selected,
    min_occupancy_pct: Number(document.getElementById('occ').value),
  };
}

function renderFilters(filter) {
  const list = document.getElementById('area-list');
  const selected = new Set(filter.selected_areas);
  list.innerHTML = areas.map(a => `
    <label><input type="checkbox" value="${esc(a)}" ${selected.has(a) ? 'checked' : ''}>${esc(a)}</label>
  `).join('');
  const occ = document.getElementById('occ');
  occ.value = filter.min_occupancy_pct;
  document.getElementById('occ-value').textContent = occ.value;
}

function scheduleRefresh() {
  // Coalesce slider drags into one request per frame.
  if (pending) cancelAnimationFrame(pending);
  pending = requestAnimationFrame(() => { pending = null; refresh(); });
}

document.getElementById('area-list').addEventListener('change', scheduleRefresh);
document.getElementById('occ').addEventListener('input', e => {
  document.getElementById('occ-value').textContent = e.target.value;
  scheduleRefresh();
});
document.getElementById('select-all').addEventListener('click', () => {
  document.querySelectorAll('#area-list input').forEach(i => i.checked = true);
  scheduleRefresh();
});
document.getElementById('select-none').addEventListener('click', () => {
  document.querySelectorAll('#area-list input').forEach(i => i.checked = false);
  scheduleRefresh();
});

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------
async function refresh() {
  const data = await api('POST', '/api/dashboard', currentFilter());
  if (data.error) {
    showWarning(data.error);
    document.getElementById('normal').classList.add('hidden');
    return;
  }
  if (data.state === 'empty') {
    showWarning(data.warning);
    document.getElementById('normal').classList.add('hidden');
    return;
  }
  document.getElementById('warning').style.display = 'none';
  document.getElementById('normal').classList.remove('hidden');
  renderKpis(data.kpis);
  renderCharts(data.charts);
}

function showWarning(msg) {
  const el = document.getElementById('warning');
  el.textContent = '⚠️ ' + msg;
  el.style.display = 'block';
}

function renderKpis(kpis) {
  document.getElementById('kpis').innerHTML = kpis.map(k => `
    <div class="kpi">
      <div class="label">${esc(k.label)}</div>
      <div class="value ${k.value === 'undefined' ? 'undefined' : ''}">${esc(k.value)}</div>
    </div>
  `).join('');
}

// ---------------------------------------------------------------------------
// Charts (inline SVG)
// ---------------------------------------------------------------------------
const W = 520, H = 300, PAD = { l: 48, r: 12, t: 12, b: 90 };

function shade(t) {
  // Blue → yellow ramp for value-coloured bars.
  const a = [88, 166, 255], b = [242, 204, 96];
  const c = a.map((v, i) => Math.round(v + (b[i] - v) * t));
  return `rgb(${c[0]},${c[1]},${c[2]})`;
}

function barChart(points, unit) {
  if (!points.length) return '';
  const max = Math.max(...points.map(p => p.value), 1);
  const min = Math.min(...points.map(p => p.value));
  const iw = W - PAD.l - PAD.r, ih = H - PAD.t - PAD.b;
  const bw = iw / points.length;
  let svg = `<svg viewBox="0 0 ${W} ${H}" width="100%">`;
  svg += `<line class="axis" x1="${PAD.l}" y1="${PAD.t + ih}" x2="${W - PAD.r}" y2="${PAD.t + ih}"/>`;
  svg += `<text x="4" y="${PAD.t + 8}">${fmt(max)} ${unit}</text>`;
  points.forEach((p, i) => {
    const h = (p.value / max) * ih;
    const x = PAD.l + i * bw + bw * 0.15;
    const y = PAD.t + ih - h;
    const t = max === min ? 0.5 : (p.value - min) / (max - min);
    svg += `<rect x="${x}" y="${y}" width="${bw * 0.7}" height="${h}" fill="${shade(t)}">` +
           `<title>${esc(p.area)}: ${fmt(p.value)} ${unit}</title></rect>`;
    const lx = x + bw * 0.35, ly = PAD.t + ih + 8;
    svg += `<text x="${lx}" y="${ly}" transform="rotate(45 ${lx} ${ly})">${esc(p.area)}</text>`;
  });
  return svg + '</svg>';
}

function donut(slices) {
  const total = slices.reduce((s, x) => s + x.energy_kwh, 0);
  const cx = W / 2, cy = H / 2, r = 110, inner = r * 0.45;
  let svg = `<svg viewBox="0 0 ${W} ${H}" width="100%">`;
  if (total <= 0) {
    svg += `<text x="${cx}" y="${cy}" text-anchor="middle">No energy consumed</text>`;
    return svg + '</svg>';
  }
  const colors = { Solar: 'var(--solar)', Grid: 'var(--grid)' };
  let angle = -Math.PI / 2;
  slices.forEach((s, i) => {
    const frac = s.energy_kwh / total;
    if (frac <= 0) return;
    const color = colors[s.source] || '#888';
    if (frac >= 0.9999) {
      svg += `<circle cx="${cx}" cy="${cy}" r="${r}" fill="${color}"/>`;
    } else {
      const end = angle + frac * 2 * Math.PI;
      const large = frac > 0.5 ? 1 : 0;
      const x1 = cx + r * Math.cos(angle), y1 = cy + r * Math.sin(angle);
      const x2 = cx + r * Math.cos(end), y2 = cy + r * Math.sin(end);
      svg += `<path d="M${cx},${cy} L${x1},${y1} A${r},${r} 0 ${large} 1 ${x2},${y2} Z" fill="${color}">` +
             `<title>${s.source}: ${fmt(s.energy_kwh)} kWh</title></path>`;
      angle = end;
    }
    svg += `<rect x="${W - 110}" y="${20 + i * 18}" width="10" height="10" fill="${color}"/>`;
    svg += `<text x="${W - 95}" y="${29 + i * 18}">${s.source} ${(frac * 100).toFixed(1)}%</text>`;
  });
  svg += `<circle cx="${cx}" cy="${cy}" r="${inner}" fill="var(--surface)"/>`;
  return svg + '</svg>';
}

function scatter(points) {
  if (!points.length) return '';
  const ph = { l: 48, r: 16, t: 16, b: 36 };
  const iw = W - ph.l - ph.r, ih = H - ph.t - ph.b;
  const maxE = Math.max(...points.map(p => p.energy_kwh), 1);
  const maxS = Math.max(...points.map(p => p.size), 1);
  let svg = `<svg viewBox="0 0 ${W} ${H}" width="100%">`;
  svg += `<line class="axis" x1="${ph.l}" y1="${ph.t + ih}" x2="${W - ph.r}" y2="${ph.t + ih}"/>`;
  svg += `<line class="axis" x1="${ph.l}" y1="${ph.t}" x2="${ph.l}" y2="${ph.t + ih}"/>`;
  svg += `<text x="${W / 2}" y="${H - 6}" text-anchor="middle">Occupancy (%)</text>`;
  svg += `<text x="4" y="${ph.t + 8}">${fmt(maxE)} kWh</text>`;
  points.forEach((p, i) => {
    const x = ph.l + (p.occupancy_pct / 100) * iw;
    const y = ph.t + ih - (p.energy_kwh / maxE) * ih;
    const r = 4 + 14 * Math.sqrt(p.size / maxS);
    const hue = Math.round((i * 360) / points.length);
    svg += `<circle cx="${x}" cy="${y}" r="${r}" fill="hsla(${hue},70%,60%,0.7)">` +
           `<title>${esc(p.area)}: ${p.occupancy_pct}% occupancy, ${fmt(p.energy_kwh)} kWh</title></circle>`;
  });
  return svg + '</svg>';
}

function renderCharts(c) {
  document.getElementById('chart-energy').innerHTML = barChart(c.energy_by_area, 'kWh');
  document.getElementById('chart-split').innerHTML = donut(c.energy_split);
  document.getElementById('chart-scatter').innerHTML = scatter(c.occupancy_vs_energy);
  document.getElementById('chart-co2').innerHTML = barChart(c.co2_by_area, 'kg');
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------
async function loadInsights() {
  const i = await api('GET', '/api/insights');
  document.getElementById('insights').innerHTML = `
    <h3>Key Insights &amp; Sustainability Actions</h3>
    <ul>${i.key_insights.map(s => `<li>${esc(s)}</li>`).join('')}</ul>
    <h3 style="margin-top:16px">Long-Term Sustainability Plan</h3>
    <ul>${i.sustainability_plan.map(s => `<li>${esc(s)}</li>`).join('')}</ul>
    <div class="target">Target: ${esc(i.target)}</div>
  `;
}

// ---------------------------------------------------------------------------
// Boot
// ---------------------------------------------------------------------------
(async function init() {
  const a = await api('GET', '/api/areas');
  areas = a.areas;
  renderFilters(a.default_filter);
  await Promise.all([refresh(), loadInsights()]);
})();
</script>
</body>
</html>
"##;
