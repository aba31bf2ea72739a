//! Tera sources for generated files.

pub(super) const LAUNCH_SCRIPT: &str = r#"#!/usr/bin/env bash
## {{ name }}.sh

set -o errexit
set -o nounset
set -o pipefail

cd "{{ path }}"

# replace a session left over from a previous start
if screen -list | grep -q "\.{{ name }}[[:space:]]"; then
    screen -S "{{ name }}" -X quit >/dev/null 2>&1
fi
screen -dmS "{{ name }}" java -Xms{{ memory_gb }}G -Xmx{{ memory_gb }}G -jar "{{ jar }}" nogui
"#;

pub(super) const SERVICE_UNIT: &str = r#"[Unit]
Description=Minecraft server {{ name }}
After=network-online.target
Wants=network-online.target

[Service]
Type=forking
WorkingDirectory={{ path }}
ExecStart=/usr/bin/env bash {{ path }}/{{ script }}
ExecStop=/usr/bin/env screen -S {{ name }} -X stuff "stop\r"
Restart=on-failure

[Install]
WantedBy=multi-user.target
"#;
