use anyhow::Result;
use serde::Serialize;

use super::style::LayoutConfig;
use crate::chat::SUGGESTIONS;
use crate::graph::model::GRAPH_TITLE;
use crate::profile::escape_html;

/// Serialise `value` for embedding inside a `<script>` element
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Build the single-page explorer. Graph data is fetched from `/api/graph`;
/// highlight, reset and refresh frames arrive over `/ws`.
pub fn render_page(layout: &LayoutConfig) -> Result<String> {
    let suggestion_chips: String = SUGGESTIONS
        .iter()
        .map(|q| {
            format!(
                r#"<button class="suggestion-chip" data-query="{0}">{0}</button>"#,
                escape_html(q)
            )
        })
        .collect();

    let html = format!(
        r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{ font-family: 'Google Sans', -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f8f9fa; color: #202124; height: 100vh; display: flex; overflow: hidden; }}

        /* Layout */
        .graph-container {{ flex: 1; position: relative; overflow: hidden; display: flex; flex-direction: column; }}
        .view-header {{ padding: 14px 24px; background: #fff; border-bottom: 1px solid #dadce0; display: flex; align-items: center; gap: 16px; }}
        .view-title {{ font-size: 1.1em; font-weight: 500; }}
        .back-to-graph {{ cursor: pointer; color: #4285f4; }}
        .crumb-sep {{ color: #dadce0; margin: 0 8px; }}
        .graph-meta {{ margin-left: auto; font-size: 0.8em; color: #5f6368; }}
        #universe-graph {{ flex: 1; width: 100%; }}

        /* Tooltip */
        #graph-tooltip {{ position: absolute; pointer-events: none; background: #fff; border: 1px solid #dadce0; border-radius: 8px; padding: 10px 14px; max-width: 280px; box-shadow: 0 4px 12px rgba(0,0,0,0.12); opacity: 0; transition: opacity 0.15s; z-index: 20; }}
        #graph-tooltip.visible {{ opacity: 1; }}
        .tooltip-title {{ font-weight: 600; }}
        .tooltip-type {{ font-size: 0.75em; color: #5f6368; text-transform: uppercase; letter-spacing: 0.5px; margin: 2px 0 6px; }}
        .tooltip-description {{ font-size: 0.85em; color: #3c4043; }}

        /* Assistant panel */
        #assistant {{ width: 380px; background: #fff; border-left: 1px solid #dadce0; display: flex; flex-direction: column; }}
        #assistant.hidden {{ display: none; }}
        .assistant-header {{ padding: 14px 18px; border-bottom: 1px solid #dadce0; display: flex; align-items: center; justify-content: space-between; font-weight: 500; }}
        .icon-btn {{ background: none; border: none; cursor: pointer; font-size: 18px; color: #5f6368; }}
        #toggleAssistant {{ position: absolute; right: 16px; bottom: 16px; display: none; width: 48px; height: 48px; border-radius: 50%; border: none; background: #4285f4; color: #fff; font-size: 20px; cursor: pointer; align-items: center; justify-content: center; }}
        #chatMessages {{ flex: 1; overflow-y: auto; padding: 16px; display: flex; flex-direction: column; gap: 12px; }}
        .message-group {{ display: flex; }}
        .user-message {{ margin-left: auto; }}
        .user-message .message-bubble {{ background: #e8f0fe; }}
        .message-bubble {{ background: #f1f3f4; border-radius: 12px; padding: 10px 14px; font-size: 0.9em; line-height: 1.45; max-width: 300px; }}
        .related-links {{ margin-top: 8px; display: flex; flex-wrap: wrap; gap: 6px; align-items: center; }}
        .link-label {{ font-size: 0.75em; color: #5f6368; width: 100%; }}
        .entity-link {{ font-size: 0.8em; padding: 3px 10px; border-radius: 12px; background: #fff; border: 1px solid #dadce0; color: #1a73e8; text-decoration: none; }}
        .entity-link:hover {{ background: #e8f0fe; }}
        .suggested-questions {{ display: flex; flex-direction: column; gap: 6px; }}
        .suggestion-chip {{ text-align: left; padding: 8px 12px; border-radius: 16px; border: 1px solid #dadce0; background: #fff; cursor: pointer; font-size: 0.85em; color: #3c4043; }}
        .suggestion-chip:hover {{ background: #f1f3f4; }}
        .chat-input {{ display: flex; gap: 8px; padding: 12px; border-top: 1px solid #dadce0; }}
        #chatInput {{ flex: 1; padding: 10px 14px; border-radius: 20px; border: 1px solid #dadce0; outline: none; font-size: 0.9em; }}
        #chatInput:focus {{ border-color: #4285f4; }}
        #sendButton {{ padding: 0 16px; border-radius: 20px; border: none; background: #4285f4; color: #fff; cursor: pointer; }}

        /* Dossier */
        .profile-view {{ flex: 1; overflow-y: auto; padding: 24px 32px; background: #fff; }}
        .profile-type {{ font-size: 0.8em; text-transform: uppercase; letter-spacing: 1px; color: #5f6368; }}
        .profile-subtitle {{ font-size: 1.4em; font-weight: 500; margin-top: 4px; }}
        .profile-hero img {{ max-width: 100%; max-height: 320px; border-radius: 12px; margin: 16px 0; }}
        .profile-bio {{ line-height: 1.6; margin-bottom: 16px; }}
        .profile-stats {{ display: flex; gap: 16px; margin-bottom: 24px; }}
        .stat-item {{ background: #f1f3f4; border-radius: 10px; padding: 12px 16px; }}
        .stat-label {{ font-size: 0.75em; color: #5f6368; }}
        .stat-value {{ font-size: 1.4em; font-weight: 600; }}
        .section-title {{ font-size: 0.8em; text-transform: uppercase; letter-spacing: 1px; color: #5f6368; margin: 16px 0 10px; }}
        .characters-gallery, .video-grid {{ display: flex; gap: 16px; flex-wrap: wrap; }}
        .character-card {{ width: 260px; border: 1px solid #dadce0; border-radius: 12px; overflow: hidden; }}
        .character-image img {{ width: 100%; }}
        .character-info {{ padding: 10px 14px; font-size: 0.85em; }}
        .character-name {{ font-weight: 600; font-size: 1.1em; }}
        .character-archetype {{ color: #9c27b0; margin: 4px 0; }}
        .timeline-event {{ display: flex; gap: 14px; margin-bottom: 10px; align-items: flex-start; }}
        .timeline-year {{ width: 48px; font-weight: 600; color: #4285f4; }}
        .timeline-marker {{ width: 10px; height: 10px; border-radius: 50%; background: #4285f4; margin-top: 5px; }}
        .timeline-title {{ font-weight: 500; }}
        .timeline-description {{ font-size: 0.85em; color: #5f6368; }}
        .video-card {{ width: 200px; }}
        .video-thumbnail {{ height: 112px; background: #202124; border-radius: 8px; position: relative; display: flex; align-items: center; justify-content: center; color: #fff; }}
        .video-duration {{ position: absolute; right: 6px; bottom: 6px; font-size: 0.75em; background: rgba(0,0,0,0.7); padding: 1px 5px; border-radius: 4px; }}
        .video-title {{ font-size: 0.85em; margin-top: 6px; }}
    </style>
</head>
<body>
    <div class="graph-container">
        <div class="view-header">
            <div class="view-title">{title}</div>
            <div class="graph-meta" id="graphMeta"></div>
        </div>
        <svg id="universe-graph"></svg>
        <div id="graph-tooltip">
            <div class="tooltip-title"></div>
            <div class="tooltip-type"></div>
            <div class="tooltip-description"></div>
        </div>
        <button id="toggleAssistant" title="Open assistant">&#9993;</button>
    </div>

    <div id="assistant">
        <div class="assistant-header">
            <span>Universe Assistant</span>
            <button class="icon-btn" id="closeAssistant" title="Close">&times;</button>
        </div>
        <div id="chatMessages">
            <div class="message-group">
                <div class="message-bubble">
                    <p>Ask me about the shows, the people behind them, or the ideas they explore.</p>
                    <div class="suggested-questions">{suggestions}</div>
                </div>
            </div>
        </div>
        <div class="chat-input">
            <input id="chatInput" type="text" placeholder="Ask about the universe..." />
            <button id="sendButton">Send</button>
        </div>
    </div>

    <script src="https://d3js.org/d3.v7.min.js"></script>
    <script>
        // Lookup tables injected by Rust
        const LAYOUT = {layout};
        const TITLE = {title_json};

        const svg = d3.select('#universe-graph');
        const container = svg.append('g');
        const graphContainer = document.querySelector('.graph-container');
        const tooltip = document.getElementById('graph-tooltip');
        const chatMessages = document.getElementById('chatMessages');
        const chatInput = document.getElementById('chatInput');

        let data = {{ nodes: [], links: [] }};
        let simulation = null;
        let nodeSel = null, linkSel = null, labelSel = null;
        let width = 0, height = 0;

        const nodeStyle = d => LAYOUT.node_styles[d.type] || LAYOUT.node_styles['concept'];
        const linkStyle = d => LAYOUT.link_styles[d.type] || LAYOUT.default_link_style;
        const endpoint = v => typeof v === 'object' ? v.id : v;

        const zoom = d3.zoom()
            .scaleExtent(LAYOUT.zoom_extent)
            .on('zoom', event => container.attr('transform', event.transform));
        svg.call(zoom);

        function updateDimensions() {{
            const rect = svg.node().getBoundingClientRect();
            width = rect.width;
            height = rect.height;
            svg.attr('width', width).attr('height', height);
        }}

        function escapeHtml(text) {{
            const div = document.createElement('div');
            div.textContent = text;
            return div.innerHTML;
        }}

        // ─── Data ───
        async function loadGraph(bust) {{
            try {{
                const url = bust ? `/api/graph?t=${{Date.now()}}` : '/api/graph';
                const response = await fetch(url, {{ cache: 'no-store' }});
                if (!response.ok) throw new Error(`HTTP ${{response.status}}`);
                const snapshot = await response.json();
                data.nodes = snapshot.nodes.map(n => ({{ id: n.id, name: n.name, type: n.type, description: n.description, metadata: n.metadata }}));
                data.links = snapshot.links.map(l => ({{ source: l.source, target: l.target, type: l.type, description: l.description }}));
                document.getElementById('graphMeta').textContent =
                    `${{snapshot.metadata.entity_count}} entities · ${{snapshot.metadata.relationship_count}} relationships · updated ${{snapshot.metadata.last_updated}}`;
                container.selectAll('*').remove();
                render();
            }} catch (error) {{
                console.error('Failed to load graph data:', error);
            }}
        }}

        // ─── Rendering ───
        function render() {{
            updateDimensions();
            const known = new Set(data.nodes.map(n => n.id));
            const drawable = data.links.filter(l => known.has(endpoint(l.source)) && known.has(endpoint(l.target)));

            if (simulation) simulation.stop();
            simulation = d3.forceSimulation(data.nodes)
                .force('link', d3.forceLink(drawable).id(d => d.id).distance(d => linkStyle(d).distance).strength(LAYOUT.link_strength))
                .force('charge', d3.forceManyBody().strength(d => nodeStyle(d).charge))
                .force('center', d3.forceCenter(width / 2, height / 2))
                .force('collision', d3.forceCollide().radius(d => nodeStyle(d).radius + LAYOUT.collision_padding))
                .alphaTarget(0)
                .alphaDecay(LAYOUT.alpha_decay)
                .velocityDecay(LAYOUT.velocity_decay);

            // Links keep their snapshot index so frames can address them
            linkSel = container.append('g').attr('class', 'links')
                .selectAll('line')
                .data(data.links.map((l, i) => Object.assign(l, {{ index: i }})).filter(l => drawable.includes(l)))
                .enter().append('line')
                .attr('stroke', '#dadce0')
                .attr('stroke-width', d => linkStyle(d).stroke_width)
                .attr('stroke-opacity', LAYOUT.link_opacity);

            nodeSel = container.append('g').attr('class', 'nodes')
                .selectAll('circle')
                .data(data.nodes)
                .enter().append('circle')
                .attr('r', d => nodeStyle(d).radius)
                .attr('fill', d => nodeStyle(d).color)
                .attr('stroke', '#fff')
                .attr('stroke-width', LAYOUT.node_stroke_width)
                .style('cursor', 'pointer')
                .call(d3.drag()
                    .on('start', (event, d) => {{
                        if (!event.active) simulation.alphaTarget(0.3).restart();
                        d.fx = d.x; d.fy = d.y;
                    }})
                    .on('drag', (event, d) => {{ d.fx = event.x; d.fy = event.y; }})
                    .on('end', (event, d) => {{
                        if (!event.active) simulation.alphaTarget(0);
                        d.fx = null; d.fy = null;
                    }}))
                .on('click', (event, d) => {{ event.stopPropagation(); selectNode(d); }})
                .on('mouseover', (event, d) => showTooltip(event, d))
                .on('mousemove', event => moveTooltip(event))
                .on('mouseout', () => tooltip.classList.remove('visible'));

            labelSel = container.append('g').attr('class', 'labels')
                .selectAll('text')
                .data(data.nodes)
                .enter().append('text')
                .text(d => d.name)
                .attr('font-size', d => `${{nodeStyle(d).label_size}}px`)
                .attr('font-weight', d => nodeStyle(d).label_weight)
                .attr('fill', '#202124')
                .attr('text-anchor', 'middle')
                .attr('dy', d => nodeStyle(d).radius + 16)
                .style('pointer-events', 'none')
                .style('user-select', 'none');

            simulation.on('tick', () => {{
                linkSel.attr('x1', d => d.source.x).attr('y1', d => d.source.y)
                       .attr('x2', d => d.target.x).attr('y2', d => d.target.y);
                nodeSel.attr('cx', d => d.x).attr('cy', d => d.y);
                labelSel.attr('x', d => d.x).attr('y', d => d.y);
            }});
        }}

        function showTooltip(event, d) {{
            tooltip.querySelector('.tooltip-title').textContent = d.name;
            tooltip.querySelector('.tooltip-type').textContent = nodeStyle(d).display_name;
            tooltip.querySelector('.tooltip-description').textContent = d.description || '';
            moveTooltip(event);
            tooltip.classList.add('visible');
        }}

        function moveTooltip(event) {{
            const rect = graphContainer.getBoundingClientRect();
            tooltip.style.left = (event.pageX - rect.left + 15) + 'px';
            tooltip.style.top = (event.pageY - rect.top + 15) + 'px';
        }}

        // ─── Scene frames from the server ───
        function applyFrame(frame) {{
            if (!nodeSel) return;
            const byId = new Map(frame.nodes.map(n => [n.id, n]));
            const t = frame.transition_ms;
            nodeSel.transition().duration(t)
                .attr('opacity', d => (byId.get(d.id) || {{ opacity: 1 }}).opacity)
                .attr('r', d => (byId.get(d.id) || {{ radius: nodeStyle(d).radius }}).radius)
                .attr('stroke-width', d => (byId.get(d.id) || {{ stroke_width: LAYOUT.node_stroke_width }}).stroke_width);
            labelSel.transition().duration(t)
                .attr('opacity', d => (byId.get(d.id) || {{ label_opacity: 1 }}).label_opacity)
                .attr('font-weight', d => (byId.get(d.id) || {{ label_weight: nodeStyle(d).label_weight }}).label_weight);
            linkSel.transition().duration(t)
                .attr('stroke-opacity', d => (frame.links[d.index] || {{ stroke_opacity: LAYOUT.link_opacity }}).stroke_opacity)
                .attr('stroke-width', d => (frame.links[d.index] || linkStyle(d)).stroke_width);
            applyViewport(frame.viewport);
        }}

        function applyViewport(viewport) {{
            let transform = d3.zoomIdentity;
            if (viewport.focus) {{
                const node = data.nodes.find(n => n.id === viewport.focus);
                if (node) {{
                    transform = d3.zoomIdentity
                        .translate(width / 2 - node.x * viewport.scale, height / 2 - node.y * viewport.scale)
                        .scale(viewport.scale);
                }}
            }}
            svg.transition().duration(LAYOUT.focus_transition_ms).call(zoom.transform, transform);
        }}

        function connect() {{
            const scheme = location.protocol === 'https:' ? 'wss' : 'ws';
            const socket = new WebSocket(`${{scheme}}://${{location.host}}/ws`);
            socket.onmessage = event => {{
                const message = JSON.parse(event.data);
                if (message.type === 'highlight' || message.type === 'reset') applyFrame(message.frame);
                else if (message.type === 'refresh') loadGraph(true);
            }};
            socket.onclose = () => setTimeout(connect, 2000);
        }}

        // ─── Assistant ───
        function addUserMessage(text) {{
            const group = document.createElement('div');
            group.className = 'message-group';
            group.innerHTML = `<div class="user-message"><div class="message-bubble">${{escapeHtml(text)}}</div></div>`;
            chatMessages.appendChild(group);
            chatMessages.scrollTop = chatMessages.scrollHeight;
        }}

        function addAssistantMessage(text, relatedLinks) {{
            const group = document.createElement('div');
            group.className = 'message-group';
            let links = '';
            if (relatedLinks && relatedLinks.length > 0) {{
                links = `<div class="related-links"><div class="link-label">Related links:</div>${{
                    relatedLinks.map(l => `<a href="#" class="entity-link ${{escapeHtml(l.type)}}">${{escapeHtml(l.label)}}</a>`).join('')
                }}</div>`;
            }}
            group.innerHTML = `<div class="assistant-message"><div class="message-bubble"><p>${{escapeHtml(text)}}</p>${{links}}</div></div>`;
            chatMessages.appendChild(group);
            chatMessages.scrollTop = chatMessages.scrollHeight;
        }}

        async function postJson(url, body) {{
            const response = await fetch(url, {{
                method: 'POST',
                headers: {{ 'Content-Type': 'application/json' }},
                body: JSON.stringify(body || {{}})
            }});
            if (response.status === 204) return null;
            if (!response.ok) throw new Error(`HTTP ${{response.status}}`);
            return response.json();
        }}

        async function sendMessage() {{
            const message = chatInput.value.trim();
            if (!message) return;
            addUserMessage(message);
            chatInput.value = '';
            try {{
                const reply = await postJson('/api/chat', {{ message }});
                if (reply) addAssistantMessage(reply.text, reply.relatedLinks);
            }} catch (error) {{
                console.error('Error processing query:', error);
            }}
        }}

        async function clickEntityLink(label) {{
            try {{
                const reply = await postJson('/api/entity-link', {{ label }});
                if (reply) addAssistantMessage(reply.text, reply.relatedLinks);
            }} catch (error) {{
                console.error('Entity link failed:', error);
            }}
        }}

        // ─── Node selection and dossiers ───
        async function selectNode(d) {{
            try {{
                const result = await postJson(`/api/nodes/${{encodeURIComponent(d.id)}}/select`);
                if (!result) return;
                if (result.kind === 'profile') showProfile(result.profile);
                else {{
                    showAssistant();
                    addAssistantMessage(result.message.text, result.message.relatedLinks);
                }}
            }} catch (error) {{
                console.error('Node selection failed:', error);
            }}
        }}

        function showProfile(profile) {{
            removeProfile();
            tooltip.classList.remove('visible');
            document.getElementById('universe-graph').style.display = 'none';
            graphContainer.insertAdjacentHTML('beforeend', profile.html);
            const viewTitle = document.querySelector('.view-title');
            viewTitle.innerHTML = profile.breadcrumb;
            document.getElementById('backToGraph').addEventListener('click', hideProfile);
        }}

        function removeProfile() {{
            const existing = document.getElementById('profile-view');
            if (existing) existing.remove();
        }}

        async function hideProfile() {{
            removeProfile();
            document.getElementById('universe-graph').style.display = 'block';
            document.querySelector('.view-title').textContent = TITLE;
            try {{ await postJson('/api/profiles/hide'); }} catch (error) {{ console.error(error); }}
        }}

        function showAssistant() {{
            document.getElementById('assistant').classList.remove('hidden');
            document.getElementById('toggleAssistant').style.display = 'none';
        }}

        // ─── Wiring ───
        document.getElementById('sendButton').addEventListener('click', sendMessage);
        chatInput.addEventListener('keypress', e => {{ if (e.key === 'Enter') sendMessage(); }});
        document.getElementById('closeAssistant').addEventListener('click', () => {{
            document.getElementById('assistant').classList.add('hidden');
            document.getElementById('toggleAssistant').style.display = 'flex';
        }});
        document.getElementById('toggleAssistant').addEventListener('click', showAssistant);
        chatMessages.addEventListener('click', e => {{
            const link = e.target.closest('.entity-link');
            if (link) {{
                e.preventDefault();
                e.stopPropagation();
                clickEntityLink(link.textContent.trim());
            }}
            const suggestion = e.target.closest('.suggestion-chip');
            if (suggestion) {{
                chatInput.value = suggestion.dataset.query;
                sendMessage();
                const chips = document.querySelector('.suggested-questions');
                if (chips) chips.style.display = 'none';
            }}
        }});
        window.addEventListener('resize', () => {{
            updateDimensions();
            if (simulation) simulation.force('center', d3.forceCenter(width / 2, height / 2)).alpha(0.3).restart();
        }});

        loadGraph(false);
        connect();
    </script>
</body>
</html>"##,
        title = escape_html(GRAPH_TITLE),
        title_json = script_json(&GRAPH_TITLE)?,
        suggestions = suggestion_chips,
        layout = script_json(layout)?,
    );

    Ok(html)
}
